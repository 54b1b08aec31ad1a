mod bootstrap;
mod layout;

pub(crate) use bootstrap::{build_app, AppWiring};
