use super::selection::Run;
use super::types::Reason;
use tracing::debug;

impl Run<'_, '_> {
    /// Rattrapage chef d'équipe, une seule fois après la passe principale.
    /// Balaye depuis la position d'arrêt du curseur, pas depuis le début.
    pub(super) fn backfill(&mut self) {
        if self.leader_picked {
            return;
        }

        let roster = self.roster;
        let rest = roster.as_slice().get(self.cursor..).unwrap_or_default();
        let leader = rest
            .iter()
            .copied()
            .find(|m| m.team_leader && !self.examined.contains(&m.id));
        let anyone = rest
            .iter()
            .copied()
            .find(|m| m.schedule_with.is_none() && !self.examined.contains(&m.id));

        match (leader, anyone) {
            (Some(leader), _) => self.pick(leader, Reason::AddedTeamLeader),
            (None, Some(anyone)) => self.pick(anyone, Reason::NoTeamLeaders),
            (None, None) => debug!(crew = self.crew_len(), "no backfill candidate left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Member, MemberId};
    use crate::scheduler::ordering::OrderedRoster;
    use crate::scheduler::selection::select;
    use crate::scheduler::{Reason, SelectOptions};
    use chrono::NaiveDate;

    fn id(n: u32) -> MemberId {
        MemberId::new(n).unwrap()
    }

    fn dated(n: u32, year: i32) -> Member {
        Member::new(id(n), format!("F{n}"), format!("L{n}"))
            .scheduled_on(NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
    }

    #[test]
    fn leader_past_the_cursor_is_added_as_sixth() {
        let mut members: Vec<Member> = (1..=7).map(|n| dated(n, 2000 + n as i32)).collect();
        members[6].team_leader = true;
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert_eq!(sel.len(), 6);
        assert_eq!(sel.reason_for(id(7)), Some(Reason::AddedTeamLeader));
        assert!(sel.leader_picked());
    }

    #[test]
    fn without_leaders_an_unpaired_member_is_added() {
        let members: Vec<Member> = (1..=8)
            .map(|n| {
                let m = dated(n, 2000 + n as i32);
                if n == 6 {
                    m.with_partner(id(1))
                } else {
                    m
                }
            })
            .collect();
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        // 6 est apparié, le premier non apparié non examiné est 7
        assert_eq!(sel.len(), 6);
        assert_eq!(sel.reason_for(id(7)), Some(Reason::NoTeamLeaders));
        assert!(!sel.leader_picked());
    }

    #[test]
    fn exhausted_roster_ends_leaderless() {
        let members: Vec<Member> = (1..=3).map(|n| dated(n, 2010 + n as i32)).collect();
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert_eq!(sel.len(), 3);
        assert!(!sel.leader_picked());
    }
}
