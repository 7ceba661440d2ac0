use super::{SchedError, Scheduler, Selection};
use chrono::NaiveDate;

pub(super) fn commit(
    scheduler: &mut Scheduler,
    selection: &Selection,
    effective: NaiveDate,
) -> Result<usize, SchedError> {
    // tout ou rien : on vérifie avant d'écrire
    if let Some(missing) = selection
        .member_ids()
        .find(|id| scheduler.roster.find_by_id(*id).is_none())
    {
        return Err(SchedError::UnknownMember(missing));
    }

    let mut updated = 0usize;
    for id in selection.member_ids() {
        if let Some(member) = scheduler.roster.find_by_id_mut(id) {
            member.last_scheduled = Some(effective);
            updated += 1;
        }
    }
    tracing::info!(updated, date = %effective, "selection committed");
    Ok(updated)
}
