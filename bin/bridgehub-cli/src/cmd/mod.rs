pub(crate) mod alias;
pub(crate) mod base_cost;
pub(crate) mod bytecode_hash;
pub(crate) mod log_root;
pub(crate) mod simulate;
