use clap::Args;
use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{
        Alignment, Modify, Style, Width,
        object::{Columns, Rows},
    },
};
use terminal_size::{Width as TermWidth, terminal_size};

use crate::{
    cli::{Context, commands::ExitOnErr},
    postgres::PgClient,
    services::StateCollector,
    types::{Snapshot, TableRef},
    utils::{RunContext, or_na},
};

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Table to inspect, defaults to the configured source table
    #[arg(short, long)]
    pub table: Option<String>,

    /// Schema of the table, defaults to the configured schema
    #[arg(short, long)]
    pub schema: Option<String>,
}

#[derive(Tabled)]
struct KeyValueRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Attribute")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ForeignKeyRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Constraint")]
    name: String,

    #[tabled(rename = "Table")]
    table: String,

    #[tabled(rename = "Column")]
    column: String,
}

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "#")]
    index: String,

    #[tabled(rename = "Type")]
    object_type: String,

    #[tabled(rename = "Name")]
    name: String,
}

pub async fn execute(args: &InspectArgs, ctx: &Context<'_>) -> i32 {
    let migration = &ctx.settings.migration;
    let table = TableRef::new(
        args.schema.as_deref().unwrap_or(&migration.schema),
        args.table.as_deref().unwrap_or(&migration.source_table),
    );

    let mut client = PgClient::connect(&ctx.settings.database)
        .await
        .exit_on_err("Failed to connect to database");

    let mut run_ctx = RunContext::default();
    let snapshot = StateCollector::new(&mut client)
        .snapshot(&table, &mut run_ctx)
        .await;
    client.close().await;

    let snapshot = snapshot.exit_on_err(&format!("Failed to inspect {}", table));
    if !snapshot.exists {
        println!("⚠️ Table {} does not exist", table);
        return 1;
    }

    print_summary(&snapshot);
    print_objects(&snapshot);
    0
}

fn index_cell(index: usize) -> String {
    index.to_string().bright_black().to_string()
}

fn print_summary(snapshot: &Snapshot) {
    let rows = [
        ("Table", snapshot.table.to_string()),
        ("Records", or_na(snapshot.row_count)),
        ("Columns", or_na(snapshot.column_count)),
        ("Foreign Keys", or_na(snapshot.foreign_key_count())),
        ("Indexes", or_na(snapshot.index_count())),
        ("RLS Policies", or_na(snapshot.policy_count())),
        ("Triggers", or_na(snapshot.trigger_count())),
    ];

    let table_data: Vec<KeyValueRow> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (key, value))| KeyValueRow {
            index: index_cell(i + 1),
            key: key.to_string(),
            value,
        })
        .collect();

    let table = Table::new(table_data)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

fn print_objects(snapshot: &Snapshot) {
    let terminal_width = if let Some((TermWidth(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    };

    if let Some(fks) = snapshot.foreign_keys.as_ref().filter(|fks| !fks.is_empty()) {
        let table_data: Vec<ForeignKeyRow> = fks
            .iter()
            .enumerate()
            .map(|(i, fk)| ForeignKeyRow {
                index: index_cell(i + 1),
                name: fk.name.clone(),
                table: fk.table.clone(),
                column: fk.column.clone(),
            })
            .collect();

        let table = Table::new(table_data)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
            .with(Modify::new(Columns::one(1)).with(Width::truncate(60).suffix("...")))
            .with(Width::increase(terminal_width))
            .to_string();
        println!("{}", table);
    }

    let objects = [
        ("Index", &snapshot.indexes),
        ("Policy", &snapshot.policies),
        ("Trigger", &snapshot.triggers),
    ];
    let table_data: Vec<ObjectRow> = objects
        .into_iter()
        .flat_map(|(object_type, names)| {
            names
                .iter()
                .flatten()
                .map(move |name| (object_type, name.clone()))
        })
        .enumerate()
        .map(|(i, (object_type, name))| ObjectRow {
            index: index_cell(i + 1),
            object_type: object_type.to_string(),
            name,
        })
        .collect();

    if table_data.is_empty() {
        return;
    }

    let table = Table::new(table_data)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()))
        .with(Width::increase(terminal_width))
        .to_string();
    println!("{}", table);
}
