use crate::cli::Context;

pub async fn execute(ctx: &Context<'_>) -> i32 {
    ctx.settings.print_config();
    0
}
