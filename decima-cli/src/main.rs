use anyhow::Result;

fn main() -> Result<()> {
    decima_cli::app::run()
}
