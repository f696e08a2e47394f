use crate::cli::args::{CliArgs, CollectAction, Command, ListOpts, VolunteerAction};
use crate::engine::SortOrder;
use crate::model::{CollectSort, VolunteerSort};

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    match &args.command {
        Command::Login => Ok(()),
        Command::Volunteers { action } => validate_volunteers(action),
        Command::Collects { action } => validate_collects(action),
    }
}

fn validate_volunteers(action: &VolunteerAction) -> Result<(), String> {
    match action {
        VolunteerAction::List { opts } => {
            validate_list_opts(opts)?;
            if let Some(raw) = opts.sort_by.as_deref() {
                VolunteerSort::parse(raw).ok_or_else(|| {
                    format!("invalid --sort-by '{raw}', expected name|location|points|date")
                })?;
            }
            Ok(())
        }
        VolunteerAction::Add { points, .. } => {
            if *points < 0 {
                return Err("points must be non-negative".to_string());
            }
            Ok(())
        }
        VolunteerAction::Update { points, .. } => {
            if points.is_some_and(|p| p < 0) {
                return Err("points must be non-negative".to_string());
            }
            Ok(())
        }
        VolunteerAction::Delete { .. } => Ok(()),
    }
}

fn validate_collects(action: &CollectAction) -> Result<(), String> {
    match action {
        CollectAction::List { opts } => {
            validate_list_opts(opts)?;
            if let Some(raw) = opts.sort_by.as_deref() {
                CollectSort::parse(raw).ok_or_else(|| {
                    format!("invalid --sort-by '{raw}', expected item|location|quantity|date")
                })?;
            }
            Ok(())
        }
        CollectAction::Add { quantity, date, .. } => {
            if *quantity < 0 {
                return Err("quantity must be non-negative".to_string());
            }
            if let Some(raw) = date.as_deref() {
                crate::utils::parse_date_input(raw)
                    .map_err(|e| format!("invalid --date '{raw}': {e}"))?;
            }
            Ok(())
        }
        CollectAction::Update { quantity, date, .. } => {
            if quantity.is_some_and(|q| q < 0) {
                return Err("quantity must be non-negative".to_string());
            }
            if let Some(raw) = date.as_deref() {
                crate::utils::parse_date_input(raw)
                    .map_err(|e| format!("invalid --date '{raw}': {e}"))?;
            }
            Ok(())
        }
        CollectAction::Inc { .. } | CollectAction::Dec { .. } | CollectAction::Delete { .. } => {
            Ok(())
        }
    }
}

fn validate_list_opts(opts: &ListOpts) -> Result<(), String> {
    if let Some(raw) = opts.from.as_deref() {
        crate::utils::parse_date_input(raw).map_err(|e| format!("invalid --from '{raw}': {e}"))?;
    }
    if let Some(raw) = opts.to.as_deref() {
        crate::utils::parse_date_input(raw).map_err(|e| format!("invalid --to '{raw}': {e}"))?;
    }
    if let Some(raw) = opts.order.as_deref() {
        SortOrder::parse(raw)
            .ok_or_else(|| format!("invalid --order '{raw}', expected asc or desc"))?;
    }
    Ok(())
}
