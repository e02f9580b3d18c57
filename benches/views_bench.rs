use std::sync::Arc;

use alinea::clock::SystemClock;
use alinea::config::default_seed_accounts;
use alinea::models::{Category, NewReport, ReportDraft, ReportStatus, ReportType, WeekNumber};
use alinea::report_store::ReportStore;
use alinea::storage::KeyValueStore;
use alinea::views::{visible_reports, DivisionSummary, ReportFilter};
use alinea_memory::InMemoryStore;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn setup(count: usize) -> ReportStore {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut store = ReportStore::open(storage, Arc::new(SystemClock)).unwrap();
    let authors = default_seed_accounts();

    for i in 0..count {
        let author = &authors[i % authors.len()];
        let draft = ReportDraft {
            title: format!("Report number {}", i),
            content: format!("Progress notes for period {} across the {} division.", i, author.division),
            report_type: if i % 4 == 0 { ReportType::Monthly } else { ReportType::Weekly },
            week_number: Some(WeekNumber::ALL[i % 4]),
            category: Some(Category::ALL[i % 4]),
            status: ReportStatus::ALL[i % 4],
        };
        store.add_report(NewReport::authored_by(author, draft)).unwrap();
    }
    store
}

fn bench_add_report(c: &mut Criterion) {
    let mut store = setup(200);
    let author = default_seed_accounts().remove(1);
    let draft = ReportDraft {
        title: "Bench report".to_string(),
        content: "Content long enough to be a real report body.".to_string(),
        report_type: ReportType::Weekly,
        week_number: Some(WeekNumber::One),
        category: None,
        status: ReportStatus::Draft,
    };

    c.bench_function("add_report_200", |b| {
        b.iter(|| {
            let report = store
                .add_report(NewReport::authored_by(&author, black_box(draft.clone())))
                .unwrap();
            store.delete_report(&report.id).unwrap()
        })
    });
}

fn bench_sorted_listing(c: &mut Criterion) {
    let store = setup(1000);
    c.bench_function("list_all_sorted_newest_first_1000", |b| {
        b.iter(|| black_box(store.list_all_sorted_newest_first().len()))
    });
}

fn bench_filtered_listing(c: &mut Criterion) {
    let store = setup(1000);
    let viewer = default_seed_accounts().remove(2);
    let filter = ReportFilter {
        search: Some("period 9".to_string()),
        status: Some(ReportStatus::Draft),
        report_type: None,
    };

    c.bench_function("visible_filtered_1000", |b| {
        b.iter(|| {
            let visible = visible_reports(&viewer, store.reports());
            black_box(filter.apply(visible).len())
        })
    });
}

fn bench_division_summary(c: &mut Criterion) {
    let store = setup(1000);
    c.bench_function("division_summary_1000", |b| {
        b.iter(|| black_box(DivisionSummary::build(store.reports())))
    });
}

criterion_group!(
    benches,
    bench_add_report,
    bench_sorted_listing,
    bench_filtered_listing,
    bench_division_summary
);
criterion_main!(benches);
