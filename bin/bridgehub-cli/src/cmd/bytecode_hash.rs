use alloy_primitives::{Bytes, hex};
use bridgehub_primitives::{hash_l2_bytecode, validate_bytecode};
use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub(crate) struct BytecodeHashArgs {
    /// Bytecode (hex)
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    bytecode: Option<Bytes>,

    /// File holding the hex encoded bytecode
    #[arg(long)]
    file: Option<PathBuf>,
}

impl BytecodeHashArgs {
    pub(crate) fn run(self) -> Result<()> {
        let bytecode = match (self.bytecode, &self.file) {
            (Some(bytecode), _) => bytecode.to_vec(),
            (None, Some(path)) => {
                let contents = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))?;
                hex::decode(contents.trim())
                    .wrap_err_with(|| format!("{} is not valid hex", path.display()))?
            }
            (None, None) => eyre::bail!("either a bytecode or --file is required"),
        };

        let words = validate_bytecode(&bytecode).wrap_err("invalid L2 bytecode")?;
        let hash = hash_l2_bytecode(&bytecode)?;

        println!("words: {words}");
        println!("hash:  {hash}");
        Ok(())
    }
}
