use super::ordering::OrderedRoster;
use super::types::{Pick, Reason, SelectOptions, Selection};
use crate::model::{Member, MemberId};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Contexte d'une passe de sélection. Les drapeaux « examiné » et les raisons
/// vivent ici, jamais sur les membres.
pub(super) struct Run<'r, 'a> {
    pub(super) roster: &'r OrderedRoster<'a>,
    opts: SelectOptions,
    pub(super) cursor: usize,
    pub(super) examined: HashSet<MemberId>,
    picked: HashSet<MemberId>,
    /// Retirés par l'opérateur pendant la session : jamais repris, même par un binôme.
    deselected: HashSet<MemberId>,
    picks: Vec<Pick>,
    pub(super) leader_picked: bool,
}

impl<'r, 'a> Run<'r, 'a> {
    pub(super) fn new(roster: &'r OrderedRoster<'a>, opts: SelectOptions) -> Self {
        Self {
            roster,
            opts,
            cursor: 0,
            examined: HashSet::new(),
            picked: HashSet::new(),
            deselected: HashSet::new(),
            picks: Vec::new(),
            leader_picked: false,
        }
    }

    /// Reprend une session existante : équipe et membres examinés conservés.
    pub(super) fn resume(
        roster: &'r OrderedRoster<'a>,
        opts: SelectOptions,
        previous: &Selection,
    ) -> Self {
        let mut run = Self::new(roster, opts);
        run.examined = previous.examined.clone();
        run.deselected = previous.deselected.clone();
        for pick in &previous.picks {
            run.picked.insert(pick.member);
            run.leader_picked |= pick.team_leader;
        }
        run.picks = previous.picks.clone();
        run
    }

    pub(super) fn finish(self) -> Selection {
        info!(
            crew = self.picks.len(),
            leader = self.leader_picked,
            "selection finished"
        );
        Selection {
            picks: self.picks,
            examined: self.examined,
            deselected: self.deselected,
        }
    }

    pub(super) fn crew_len(&self) -> usize {
        self.picks.len()
    }

    pub(super) fn pick(&mut self, member: &Member, reason: Reason) {
        self.examined.insert(member.id);
        self.picked.insert(member.id);
        self.leader_picked |= member.team_leader;
        debug!(member = %member.id, %reason, "picked");
        self.picks.push(Pick {
            member: member.id,
            reason,
            team_leader: member.team_leader,
        });
    }

    /// Passe principale : parcourt le roster trié jusqu'à la borne ou la fin.
    pub(super) fn primary_pass(&mut self) {
        let roster = self.roster;
        let order = roster.as_slice();
        while self.cursor < order.len()
            && self.picks.len() < self.opts.primary_bound(self.leader_picked)
        {
            let nominee = order[self.cursor];
            self.cursor += 1;

            if !self.examined.insert(nominee.id) {
                continue;
            }
            if self.leader_picked && nominee.team_leader {
                debug!(member = %nominee.id, "second team leader rejected");
                continue;
            }
            match nominee.schedule_with {
                None => self.pick(nominee, Reason::OldestScheduled),
                Some(partner) => self.expand_pairing(nominee, partner),
            }
        }
    }

    /// Ajoute le nominé puis suit la chaîne de binômes. L'appartenance par id à
    /// l'équipe coupe les cycles ; la borne d'expansion coupe les longues chaînes.
    /// Équipe déjà à la borne : le nominé n'est pas ajouté (il reste examiné).
    fn expand_pairing(&mut self, nominee: &Member, first: MemberId) {
        if self.picks.len() >= self.opts.expansion_bound(self.leader_picked) {
            debug!(member = %nominee.id, crew = self.picks.len(), "no room for a pair");
            return;
        }
        self.pick(nominee, Reason::OldestScheduled);

        let mut next = Some(first);
        while let Some(id) = next {
            if self.picked.contains(&id) {
                break;
            }
            if self.deselected.contains(&id) {
                debug!(member = %nominee.id, partner = %id, "partner was deselected, chain ends");
                break;
            }
            let Some(partner) = self.roster.get(id) else {
                warn!(member = %nominee.id, partner = %id, "pairing does not resolve, chain ends");
                break;
            };
            self.pick(partner, Reason::ScheduleWith(nominee.id));
            next = partner.schedule_with;
            if self.picks.len() >= self.opts.expansion_bound(self.leader_picked) {
                break;
            }
        }
    }
}

/// Sélectionne une équipe dans un roster trié.
pub fn select(roster: &OrderedRoster<'_>, opts: SelectOptions) -> Selection {
    let mut run = Run::new(roster, opts);
    run.primary_pass();
    run.backfill();
    run.finish()
}

/// Complète une sélection après désélection : nouvelle passe depuis le début du
/// roster, les membres déjà examinés dans la session sont ignorés.
pub fn reselect(
    roster: &OrderedRoster<'_>,
    previous: &Selection,
    opts: SelectOptions,
) -> Selection {
    let mut run = Run::resume(roster, opts, previous);
    run.primary_pass();
    run.backfill();
    run.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::LeaderSlot;

    fn id(n: u32) -> MemberId {
        MemberId::new(n).unwrap()
    }

    fn plain(n: u32) -> Member {
        Member::new(id(n), format!("F{n}"), format!("L{n}"))
    }

    fn ids(sel: &Selection) -> Vec<u32> {
        sel.member_ids().map(MemberId::get).collect()
    }

    #[test]
    fn second_leader_is_skipped_and_never_revisited() {
        let members = vec![
            plain(1).leader(),
            plain(2).leader(),
            plain(3),
            plain(4),
            plain(5),
            plain(6),
        ];
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert_eq!(ids(&sel), vec![1, 3, 4, 5, 6]);
        assert!(sel.was_examined(id(2)));
    }

    #[test]
    fn chain_reason_cites_original_nominee() {
        let members = vec![
            plain(1).with_partner(id(2)),
            plain(2).with_partner(id(3)),
            plain(3),
            plain(4).leader(),
        ];
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert_eq!(sel.reason_for(id(2)), Some(Reason::ScheduleWith(id(1))));
        assert_eq!(sel.reason_for(id(3)), Some(Reason::ScheduleWith(id(1))));
    }

    #[test]
    fn long_chain_stops_at_expansion_bound() {
        let members: Vec<Member> = (1..=10)
            .map(|n| if n < 10 { plain(n).with_partner(id(n + 1)) } else { plain(n) })
            .collect();
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        // expansion arrêtée à 4 ; 5 à 9 sont appariés et n'ont plus de place, 10 complète
        assert_eq!(ids(&sel), vec![1, 2, 3, 4, 10]);
    }

    #[test]
    fn dangling_and_self_pairings_do_not_panic() {
        let members = vec![
            plain(1).with_partner(id(1)),
            plain(2).with_partner(id(42)),
            plain(3).leader(),
        ];
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert_eq!(ids(&sel), vec![1, 2, 3]);
    }

    #[test]
    fn reserve_policy_leaves_room_for_leader() {
        let members: Vec<Member> = (1..=10)
            .map(|n| if n == 9 { plain(n).leader() } else { plain(n) })
            .collect();
        let ordered = OrderedRoster::new(&members);
        let opts = SelectOptions {
            leader_slot: LeaderSlot::Reserve,
            ..Default::default()
        };
        let sel = select(&ordered, opts);
        assert_eq!(ids(&sel), vec![1, 2, 3, 4, 9]);
        assert_eq!(sel.reason_for(id(9)), Some(Reason::AddedTeamLeader));
    }

    #[test]
    fn empty_roster_yields_empty_selection() {
        let members: Vec<Member> = Vec::new();
        let ordered = OrderedRoster::new(&members);
        let sel = select(&ordered, SelectOptions::default());
        assert!(sel.is_empty());
        assert!(!sel.leader_picked());
    }

    #[test]
    fn reselect_fills_gap_without_deselected_member() {
        let members: Vec<Member> = (1..=8)
            .map(|n| if n == 1 { plain(n).leader() } else { plain(n) })
            .collect();
        let ordered = OrderedRoster::new(&members);
        let mut sel = select(&ordered, SelectOptions::default());
        assert_eq!(ids(&sel), vec![1, 2, 3, 4, 5]);

        sel.deselect(id(3)).unwrap();
        assert_eq!(sel.len(), 4);

        let refilled = reselect(&ordered, &sel, SelectOptions::default());
        assert_eq!(ids(&refilled), vec![1, 2, 4, 5, 6]);
    }

    #[test]
    fn reselect_never_pulls_back_a_deselected_partner() {
        let members: Vec<Member> = (1..=8)
            .map(|n| match n {
                1 => plain(n).leader(),
                7 => plain(n).with_partner(id(3)),
                _ => plain(n),
            })
            .collect();
        let ordered = OrderedRoster::new(&members);
        let mut sel = select(&ordered, SelectOptions::default());
        assert_eq!(ids(&sel), vec![1, 2, 3, 4, 5]);

        for n in [3, 4, 5] {
            sel.deselect(id(n)).unwrap();
        }
        let refilled = reselect(&ordered, &sel, SelectOptions::default());
        assert_eq!(ids(&refilled), vec![1, 2, 6, 7, 8]);
        assert!(!refilled.contains(id(3)));
    }
}
