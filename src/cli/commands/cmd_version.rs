use clap::Args;
use clap::crate_version;

#[derive(Args, Debug)]
pub struct VersionCommand;

pub async fn execute(_: &VersionCommand) -> i32 {
    println!("retable version: {}", crate_version!());
    0
}
