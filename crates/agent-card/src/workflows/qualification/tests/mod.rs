mod common;
mod dossier;
mod session;
mod validation;
