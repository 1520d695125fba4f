#[path = "helpers/mod.rs"]
mod helpers;

#[path = "parser/mod.rs"]
mod parser;

#[path = "query/mod.rs"]
mod query;

#[path = "extract/mod.rs"]
mod extract;

#[path = "edit/mod.rs"]
mod edit;

#[path = "outline/mod.rs"]
mod outline;
