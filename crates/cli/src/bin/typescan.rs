use anyhow::Result;

fn main() -> Result<()> {
    typescan_cli::main_entry()
}
