//! Change events published after every backend mutation

mod table_change;

pub use table_change::{ChangeKind, Table, TableChange};
