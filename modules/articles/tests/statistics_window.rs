use std::sync::Arc;

use articles::{
    contract::{DailyCount, NewArticle},
    domain::service::{Service, ServiceConfig, STATISTICS_WINDOW_DAYS},
    infra::storage::{migrations::Migrator, SeaOrmArticlesRepository},
};
use chrono::{NaiveDate, NaiveDateTime};
use modkit_db::{ConnectOpts, DbHandle};
use sea_orm_migration::MigratorTrait;

async fn service() -> Service {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .unwrap();
    Migrator::up(db.seaorm(), None).await.unwrap();
    Service::new(
        Arc::new(SeaOrmArticlesRepository::new(db.sea())),
        ServiceConfig::default(),
    )
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ts(date: NaiveDate, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date.and_hms_opt(h, min, s).unwrap()
}

async fn publish(svc: &Service, at: NaiveDateTime) {
    svc.create_article(NewArticle {
        title: "t".into(),
        author: "a".into(),
        content: "c".into(),
        publication_date: Some(at),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn window_boundaries_are_whole_days() {
    let svc = service().await;
    let today = d(2024, 3, 1);

    // First and last instants of the window count; neighbours do not.
    publish(&svc, ts(d(2024, 2, 24), 0, 0, 0)).await;
    publish(&svc, ts(d(2024, 3, 1), 23, 59, 59)).await;
    publish(&svc, ts(d(2024, 2, 23), 23, 59, 59)).await;
    publish(&svc, ts(d(2024, 3, 2), 0, 0, 0)).await;
    publish(&svc, ts(d(2024, 2, 29), 12, 0, 0)).await;
    publish(&svc, ts(d(2024, 2, 29), 18, 30, 0)).await;

    let stats = svc.statistics_for_window(today).await.unwrap();
    assert_eq!(stats.len() as u64, STATISTICS_WINDOW_DAYS);
    assert_eq!(
        stats,
        vec![
            DailyCount::new(d(2024, 2, 24), 1),
            DailyCount::new(d(2024, 2, 25), 0),
            DailyCount::new(d(2024, 2, 26), 0),
            DailyCount::new(d(2024, 2, 27), 0),
            DailyCount::new(d(2024, 2, 28), 0),
            DailyCount::new(d(2024, 2, 29), 2),
            DailyCount::new(d(2024, 3, 1), 1),
        ]
    );
}

#[tokio::test]
async fn empty_store_yields_seven_zero_days() {
    let svc = service().await;
    let stats = svc.statistics_for_window(d(2025, 1, 3)).await.unwrap();
    assert_eq!(stats.len(), 7);
    assert_eq!(stats[0].date, d(2024, 12, 28));
    assert!(stats.iter().all(|c| c.count == 0));
}

#[tokio::test]
async fn created_article_round_trips_through_storage() {
    let svc = service().await;
    let published = ts(d(2024, 8, 15), 9, 45, 0);
    let created = svc
        .create_article(NewArticle {
            title: "Hello".into(),
            author: "Ann".into(),
            content: "Body".into(),
            publication_date: Some(published),
        })
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.publication_date, published);
    assert!(created.updated_at.is_none());

    let page = svc.list_articles(None, None).await.unwrap();
    assert_eq!(page.items, vec![created]);
    assert_eq!(page.size, 10);
}
