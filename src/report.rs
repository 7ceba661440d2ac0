use crate::model::{Member, Roster};
use crate::scheduler::{Pick, Selection};

/// Permet de customiser le rendu d'une équipe (texte, tableau, mail...).
pub trait SelectionRenderer {
    fn render_pick(&self, pick: &Pick, member: Option<&Member>) -> String;
    fn render_footer(&self, selection: &Selection) -> String;
}

/// Rendu texte simple, une ligne par membre retenu.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl SelectionRenderer for TextRenderer {
    fn render_pick(&self, pick: &Pick, member: Option<&Member>) -> String {
        let name = member
            .map(Member::full_name)
            .unwrap_or_else(|| "(unknown member)".to_string());
        format!("{:>4} | {:<30} | {}", pick.member.get(), name, pick.reason)
    }

    fn render_footer(&self, selection: &Selection) -> String {
        if selection.leader_picked() {
            format!("{} member(s), team leader present", selection.len())
        } else {
            format!("{} member(s), NO team leader", selection.len())
        }
    }
}

/// Rendu complet de l'équipe à présenter à l'opérateur.
pub fn render_selection(
    roster: &Roster,
    selection: &Selection,
    renderer: &dyn SelectionRenderer,
) -> String {
    let mut out = String::new();
    for pick in selection.picks() {
        out.push_str(&renderer.render_pick(pick, roster.find_by_id(pick.member)));
        out.push('\n');
    }
    out.push_str(&renderer.render_footer(selection));
    out.push('\n');
    out
}

/// Fiche d'un membre (vue liste).
pub fn render_member(member: &Member, roster: &Roster) -> String {
    let mut out = format!("Name:           {}\n", member.full_name());
    out.push_str(&format!("Number:         {}\n", member.id));
    if let Some(partner) = member.schedule_with.and_then(|id| roster.find_by_id(id)) {
        out.push_str(&format!("Schedule With:  {}\n", partner.full_name()));
    }
    out.push_str(&format!("Team Leader:    {}\n", member.team_leader));
    out.push_str(&format!("Last Scheduled: {}\n", member.display_last_scheduled()));
    out
}
