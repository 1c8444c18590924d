use chrono::{Days, NaiveDate};
use library_lending::{
    ErrorKind, Library, LibraryConfig, LibraryError, LibraryReport, LoanState, MemberId,
    catalog::DemoCatalog,
};

/// The day the scenario is evaluated on
#[allow(clippy::expect_used)]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 17).expect("valid date")
}

/// Demo catalog with "Laskar Pelangi" lent ten days ago
#[allow(clippy::expect_used, clippy::arithmetic_side_effects)]
fn overdue_demo() -> DemoCatalog {
    let mut demo = DemoCatalog::build(&LibraryConfig::default()).expect("demo catalog should seed");
    demo.library
        .borrow_item(demo.raffi, demo.laskar_pelangi, today() - Days::new(10))
        .expect("first loan should succeed");
    demo.library
        .borrow_item(demo.asti, demo.java_ebook, today())
        .expect("second loan should succeed");
    demo
}

#[test]
fn overdue_fine_is_charged_to_borrower_only() -> Result<(), LibraryError> {
    let demo = overdue_demo();

    let fines = demo.library.current_overdue_fines(today())?;
    let total_of = |member: MemberId| fines.iter().find(|f| f.member == member).map(|f| f.total);

    assert_eq!(total_of(demo.raffi), Some(3000));
    assert_eq!(total_of(demo.asti), Some(0));
    Ok(())
}

#[test]
fn title_search_is_case_insensitive() {
    let demo = overdue_demo();

    let found: Vec<_> = demo.library.find_items_by_title("laskar").collect();

    assert_eq!(found.len(), 1);
    assert!(
        found
            .iter()
            .all(|(id, item)| *id == demo.laskar_pelangi && item.title() == "Laskar Pelangi")
    );
}

#[test]
fn year_order_keeps_catalog_order_for_ties() {
    let demo = overdue_demo();

    let sorted: Vec<_> = demo
        .library
        .items_sorted_by_year()
        .into_iter()
        .map(|(id, item)| (id, item.year()))
        .collect();

    assert_eq!(
        sorted,
        [
            (demo.laskar_pelangi, 2005),
            (demo.it_journal, 2022),
            (demo.national_geographic, 2023),
            (demo.java_ebook, 2023),
        ]
    );
}

#[test]
fn full_cycle_settles_and_reopens() -> Result<(), LibraryError> {
    let mut demo = overdue_demo();

    let refused = demo.library.borrow_item(demo.asti, demo.laskar_pelangi, today());
    assert_eq!(refused.map_err(|err| err.kind()), Err(ErrorKind::Refused));

    let closed = demo.library.return_item(demo.raffi, demo.laskar_pelangi, today())?;
    assert_eq!(demo.library.transaction(closed).map(|tx| tx.fine()), Some(3000));
    assert_eq!(
        demo.library.item(demo.laskar_pelangi).map(|item| *item.state()),
        Some(LoanState::Available)
    );

    demo.library.borrow_item(demo.asti, demo.laskar_pelangi, today())?;
    assert_eq!(demo.library.open_transactions().count(), 2);
    assert_eq!(demo.library.transactions_for_member(demo.raffi).count(), 1);
    Ok(())
}

#[test]
fn reports_render_the_scenario() -> Result<(), LibraryError> {
    let demo = overdue_demo();

    let fines = LibraryReport::member_fines(&demo.library, today())?;
    assert!(fines.contains("Laskar Pelangi: Rp3000"));
    assert!(fines.contains("Total fine: Rp0"));

    let history = LibraryReport::member_transactions(&demo.library, demo.raffi)?;
    assert!(history.contains("Laskar Pelangi"));
    assert!(!history.contains("Ebook Pemrograman Java"));
    Ok(())
}

#[test]
fn empty_library_reports_nothing_overdue() -> Result<(), LibraryError> {
    assert!(Library::default().current_overdue_fines(today())?.is_empty());
    Ok(())
}
