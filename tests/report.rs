#![forbid(unsafe_code)]
use accueil::{render_selection, Member, MemberId, Roster, Scheduler, SelectOptions, TextRenderer};
use chrono::NaiveDate;

fn id(n: u32) -> MemberId {
    MemberId::new(n).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn text_rendering_lists_reasons_in_addition_order() {
    let roster = Roster::new(vec![
        Member::new(id(1), "Ann", "Lee").with_partner(id(2)),
        Member::new(id(2), "Bo", "Kim").scheduled_on(day(2020, 6, 1)),
        Member::new(id(3), "Cy", "Pak").leader().scheduled_on(day(2023, 1, 1)),
    ]);
    let scheduler = Scheduler::new(roster);
    let sel = scheduler.select(SelectOptions::default()).unwrap();
    let text = render_selection(scheduler.roster(), &sel, &TextRenderer);

    insta::assert_snapshot!(text, @r"
       1 | Lee, Ann                       | Oldest scheduled date
       2 | Kim, Bo                        | Schedule with 1
       3 | Pak, Cy                        | Oldest scheduled date
    3 member(s), team leader present
    ");
}
