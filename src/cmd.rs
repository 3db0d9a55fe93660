use crate::data::YearStore;

pub fn print_year(store: &YearStore) {
    println!("Year {}", store.year());
    for (month, sheet) in store.months() {
        if sheet.is_empty() {
            continue;
        }
        println!(
            "  {} ({}): {} sessions, {:.1} hours",
            month.name_cz(),
            month,
            sheet.len(),
            sheet.total_hours()
        );
        for session in sheet.iter() {
            println!(
                "    {} {} {} {}",
                session.begin_date, session.begin_time, session.duration, session.description
            );
        }
    }
    println!("Total sessions: {}", store.session_count());
}
