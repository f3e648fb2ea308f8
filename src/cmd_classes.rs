//! `classes` and `status` subcommand handlers.

use tracing::info;

use crate::cli::ClassesAction;
use crate::store::Store;

/// Handle class list subcommands.
pub(crate) async fn handle_classes_command(
    action: ClassesAction,
    store: &Store,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ClassesAction::Add { specs } => {
            let added = store.add_classes(&specs).await?;
            if added.is_empty() {
                println!("Nothing added (blank or already listed).");
            }
            for class in &added {
                println!("Added {}", class);
            }
            info!("Added {} classes", added.len());
        }
        ClassesAction::Remove { index } => {
            // Positions are shown starting at 1.
            let Some(position) = index.checked_sub(1) else {
                return Err("Positions start at 1".into());
            };
            let removed = store.remove_class(position).await?;
            println!("Removed {}", removed);
        }
        ClassesAction::List => {
            let classes = store.classes().await?;
            if classes.is_empty() {
                println!("No classes added yet");
            }
            for (i, class) in classes.iter().enumerate() {
                println!("{:>3}. {}", i + 1, class);
            }
        }
        ClassesAction::Clear => {
            store.clear_classes().await?;
            println!("Class list cleared");
        }
    }
    Ok(())
}

/// Print or clear the status log.
pub(crate) async fn handle_status_command(
    clear: bool,
    store: &Store,
) -> Result<(), Box<dyn std::error::Error>> {
    if clear {
        store.clear_statuses().await?;
        println!("Status log cleared");
        return Ok(());
    }

    let statuses = store.statuses().await?;
    if statuses.is_empty() {
        println!("No status updates yet");
    }
    for status in &statuses {
        println!("{}", status);
    }
    Ok(())
}
