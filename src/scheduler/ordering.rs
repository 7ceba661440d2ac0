use crate::model::{Member, MemberId};
use std::collections::HashMap;

/// Vue triée d'un roster : date de dernière programmation croissante, les
/// « jamais programmés » en tête. Tri stable, aucun autre critère de départage.
#[derive(Debug, Clone)]
pub struct OrderedRoster<'a> {
    order: Vec<&'a Member>,
    by_id: HashMap<MemberId, &'a Member>,
}

impl<'a> OrderedRoster<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut order: Vec<&Member> = members.iter().collect();
        // Option<NaiveDate> : None < Some(_)
        order.sort_by_key(|m| m.last_scheduled);
        let by_id = members.iter().map(|m| (m.id, m)).collect();
        Self { order, by_id }
    }

    pub fn as_slice(&self) -> &[&'a Member] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Member> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: MemberId) -> Option<&'a Member> {
        self.by_id.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn member(n: u32, date: Option<(i32, u32, u32)>) -> Member {
        let m = Member::new(MemberId::new(n).unwrap(), format!("F{n}"), format!("L{n}"));
        match date {
            Some((y, mo, d)) => m.scheduled_on(NaiveDate::from_ymd_opt(y, mo, d).unwrap()),
            None => m,
        }
    }

    #[test]
    fn never_scheduled_first_then_ascending() {
        let members = vec![
            member(1, Some((2022, 1, 1))),
            member(2, None),
            member(3, Some((2020, 5, 1))),
            member(4, None),
        ];
        let ordered = OrderedRoster::new(&members);
        let ids: Vec<u32> = ordered.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let members = vec![
            member(9, Some((2021, 3, 3))),
            member(2, Some((2021, 3, 3))),
            member(5, Some((2021, 3, 3))),
        ];
        let ordered = OrderedRoster::new(&members);
        let ids: Vec<u32> = ordered.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn ordering_does_not_touch_members() {
        let members = vec![member(1, Some((2023, 1, 1))), member(2, None)];
        let before = members.clone();
        let ordered = OrderedRoster::new(&members);
        assert_eq!(ordered.get(MemberId::new(1).unwrap()).unwrap().id.get(), 1);
        assert_eq!(members, before);
    }
}
