//! Command execution logic.

use anyhow::Result;

use super::args::{EditArgs, InitArgs, ShowArgs, ViewArgs};
use crate::app::App;
use crate::domain::{CellId, ContactId};
use crate::edit::{EditSession, LocalPhotoUploader};
use crate::error::Error;
use crate::genealogy::{Genealogy, ViewState};
use crate::output::{self, ConsoleNotifier, OutputMode};

fn report_warnings(app: &App, genealogy: &Genealogy) -> Result<()> {
    output::print_warnings(app.load_warnings(), genealogy.warnings())?;
    Ok(())
}

/// Execute the init command
pub async fn execute_init(args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "rede_dir": result.rede_dir.display().to_string(),
            "config_file": result.config_file.display().to_string(),
            "contacts_file": result.contacts_file.display().to_string(),
            "cells_file": result.cells_file.display().to_string(),
        }))?,
        OutputMode::Text if !args.quiet => {
            println!("Initialized rede in {}", result.rede_dir.display());
            println!("  Config:   {}", result.config_file.display());
            println!("  Contacts: {}", result.contacts_file.display());
            println!("  Cells:    {}", result.cells_file.display());
        }
        OutputMode::Text => {}
    }

    Ok(())
}

/// Execute the tree command
pub async fn execute_tree(app: &App, output_mode: OutputMode) -> Result<()> {
    let genealogy = app.genealogy().await?;
    report_warnings(app, &genealogy)?;
    output::print_genealogy_tree(&genealogy, output_mode)?;
    Ok(())
}

/// Execute the standby command
pub async fn execute_standby(app: &App, output_mode: OutputMode) -> Result<()> {
    let genealogy = app.genealogy().await?;
    report_warnings(app, &genealogy)?;
    output::print_standby(&genealogy.partition(), output_mode)?;
    Ok(())
}

/// Build the view state described by `args`.
///
/// Unknown IDs in `--expand` are errors; expanding a member without
/// referrals is a logged no-op.
fn view_state_from_args(
    genealogy: &Genealogy,
    args: &ViewArgs,
    default_levels: &[usize],
) -> crate::error::Result<ViewState> {
    let levels: &[usize] = if args.levels.is_empty() {
        default_levels
    } else {
        &args.levels
    };
    let mut view = ViewState::with_levels(levels.iter().copied());

    if args.expand_all {
        view.expand_all(genealogy);
    }
    for raw in &args.expand {
        let id = ContactId::new(raw.as_str());
        if genealogy.get(&id).is_none() {
            return Err(Error::ContactNotFound(id));
        }
        if view.is_expanded(&id) {
            continue;
        }
        if !view.toggle_expansion(genealogy, &id) {
            tracing::info!(contact = %id, "Member has no referrals to expand");
        }
    }
    view.focus_level(args.focus);

    Ok(view)
}

/// Execute the view command
pub async fn execute_view(app: &App, args: &ViewArgs, output_mode: OutputMode) -> Result<()> {
    let genealogy = app.genealogy().await?;
    report_warnings(app, &genealogy)?;

    let view = view_state_from_args(&genealogy, args, &app.config().default_levels)?;
    let rendered = genealogy.render(&view, &app.config().layout);
    output::print_view(&rendered, &view, genealogy.len(), output_mode)?;
    Ok(())
}

/// Execute the show command
pub async fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let genealogy = app.genealogy().await?;
    report_warnings(app, &genealogy)?;

    let id = ContactId::new(args.id.as_str());
    let member = genealogy.get(&id).ok_or(Error::ContactNotFound(id))?;
    output::print_member_details(&genealogy, member, output_mode)?;
    Ok(())
}

/// Execute the stats command
pub async fn execute_stats(app: &App, output_mode: OutputMode) -> Result<()> {
    let genealogy = app.genealogy().await?;
    report_warnings(app, &genealogy)?;
    output::print_stats(&genealogy.stats(), output_mode)?;
    Ok(())
}

/// Execute the edit command
pub async fn execute_edit(app: &mut App, args: &EditArgs, output_mode: OutputMode) -> Result<()> {
    use crate::storage::ContactStore;

    let id = ContactId::new(args.id.as_str());
    let record = app
        .store()
        .contacts()
        .await?
        .into_iter()
        .find(|contact| contact.id == id)
        .ok_or_else(|| Error::ContactNotFound(id.clone()))?;

    let notifier = ConsoleNotifier::new();
    let mut session = EditSession::open(record)?;

    if let Some(photo) = &args.photo {
        session
            .attach_photo(&LocalPhotoUploader, &notifier, photo)
            .await?;
    }

    {
        let form = session.form_mut()?;
        if let Some(name) = &args.name {
            form.name.clone_from(name);
        }
        if let Some(whatsapp) = &args.whatsapp {
            form.whatsapp.clone_from(whatsapp);
        }
        if let Some(neighborhood) = &args.neighborhood {
            form.neighborhood.clone_from(neighborhood);
        }
        if let Some(status) = args.status {
            form.status = status.into();
        }
        if args.clear_referrer {
            form.referred_by = None;
        } else if let Some(referrer) = &args.referrer {
            form.referred_by = Some(ContactId::new(referrer.as_str()));
        }
        if args.clear_cell {
            form.cell_id = None;
        } else if let Some(cell) = &args.cell {
            form.cell_id = Some(CellId::new(cell.as_str()));
        }
        if args.clear_city {
            form.city_id = None;
        } else if let Some(city) = &args.city {
            form.city_id = Some(city.clone());
        }
        if args.clear_birth_date {
            form.birth_date = None;
        } else if let Some(date) = args.birth_date {
            form.birth_date = Some(date);
        }
        if let Some(flag) = args.encounter_with_god_flag() {
            form.encounter_with_god = flag;
        }
        if let Some(flag) = args.baptized_flag() {
            form.baptized = flag;
        }
        if let Some(flag) = args.founder_flag() {
            form.founder = flag;
        }
    }

    let updated = session.submit(app.store_mut(), &notifier).await?;

    if output_mode == OutputMode::Json {
        output::print_json(&updated)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactRecord;

    fn genealogy() -> Genealogy {
        let contact = |id: &str, referrer: Option<&str>| {
            let mut record = ContactRecord::new(id, id);
            record.referred_by = referrer.map(ContactId::from);
            record
        };
        Genealogy::build(
            &[
                contact("a", None),
                contact("b", Some("a")),
                contact("c", Some("b")),
            ],
            &[],
        )
        .unwrap()
    }

    fn args(levels: &[usize], expand: &[&str], expand_all: bool, focus: Option<usize>) -> ViewArgs {
        ViewArgs {
            levels: levels.to_vec(),
            expand: expand.iter().map(|s| s.to_string()).collect(),
            expand_all,
            focus,
        }
    }

    #[test]
    fn default_levels_apply_when_none_given() {
        let view = view_state_from_args(&genealogy(), &args(&[], &[], false, None), &[0, 2]).unwrap();
        assert_eq!(view.visible_levels().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn expand_is_idempotent_per_id() {
        let g = genealogy();
        let view = view_state_from_args(&g, &args(&[0, 1], &["a", "a"], false, None), &[]).unwrap();
        assert!(view.is_expanded(&ContactId::from("a")));
    }

    #[test]
    fn expanding_a_leaf_is_a_no_op() {
        let g = genealogy();
        let view = view_state_from_args(&g, &args(&[0, 1, 2], &["c"], false, None), &[]).unwrap();
        assert!(view.expanded().is_empty());
    }

    #[test]
    fn unknown_expand_id_is_an_error() {
        let err = view_state_from_args(&genealogy(), &args(&[], &["ghost"], false, None), &[0])
            .unwrap_err();
        assert!(matches!(err, Error::ContactNotFound(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn expand_all_and_focus() {
        let g = genealogy();
        let view = view_state_from_args(&g, &args(&[0], &[], true, Some(2)), &[]).unwrap();
        assert_eq!(view.expanded().len(), 2);
        assert_eq!(view.focused_level(), Some(2));
    }
}
