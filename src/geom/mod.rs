mod anchor;

pub(crate) use anchor::symbol_anchor;
