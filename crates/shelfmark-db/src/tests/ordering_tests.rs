//! Tests for display_order assignment, batch reorders, and moves.
//!
//! Covers: append-at-end slot assignment per scope, cascade delete of a
//! category's sites, gap accumulation after delete (no renormalization),
//! and category moves that keep display_order intact.

use crate::test_fixtures::TestDatabase;
use shelfmark_core::{CategoryRepository, NewSite, OrderAssignment, SiteRepository};
use uuid::Uuid;

fn new_site(category_id: Uuid, url: &str, title: &str) -> NewSite {
    NewSite {
        category_id,
        url: url.to_string(),
        title: title.to_string(),
        favicon_url: None,
    }
}

// =============================================================================
// Append-at-end assignment
// =============================================================================

#[tokio::test]
async fn test_sequential_category_creation_yields_dense_orders() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("dense").await;

    for name in ["Dev", "News", "Cooking", "Music"] {
        test_db
            .db
            .categories
            .create(owner.id, name)
            .await
            .expect("create category");
    }

    let listed = test_db
        .db
        .categories
        .list_with_sites(owner.id)
        .await
        .expect("list categories");

    let orders: Vec<i32> = listed.iter().map(|c| c.display_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);

    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Dev", "News", "Cooking", "Music"]);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_site_orders_are_scoped_per_category() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("scoped").await;

    let dev = test_db.db.categories.create(owner.id, "Dev").await.unwrap();
    let news = test_db.db.categories.create(owner.id, "News").await.unwrap();

    for n in 0..3 {
        test_db
            .db
            .sites
            .create(owner.id, new_site(dev.id, &format!("http://dev{}.com", n), "d"))
            .await
            .expect("create dev site");
    }
    // The second category starts over at zero regardless of the first.
    for n in 0..2 {
        test_db
            .db
            .sites
            .create(
                owner.id,
                new_site(news.id, &format!("http://news{}.com", n), "n"),
            )
            .await
            .expect("create news site");
    }

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    let dev_orders: Vec<i32> = listed[0].sites.iter().map(|s| s.display_order).collect();
    let news_orders: Vec<i32> = listed[1].sites.iter().map(|s| s.display_order).collect();

    assert_eq!(dev_orders, vec![0, 1, 2]);
    assert_eq!(news_orders, vec![0, 1]);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_freed_category_slot_is_not_reused() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("slots").await;

    let _a = test_db.db.categories.create(owner.id, "A").await.unwrap();
    let b = test_db.db.categories.create(owner.id, "B").await.unwrap();
    let _c = test_db.db.categories.create(owner.id, "C").await.unwrap();

    test_db.db.categories.delete(owner.id, b.id).await.unwrap();

    // Two categories remain, so the next slot is count = 2 even though C
    // already sits at 2; the tie resolves by creation order.
    let d = test_db.db.categories.create(owner.id, "D").await.unwrap();
    assert_eq!(d.display_order, 2);

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C", "D"]);

    test_db.cleanup().await;
}

// =============================================================================
// Cascade delete
// =============================================================================

#[tokio::test]
async fn test_deleting_category_deletes_its_sites() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("cascade").await;

    let doomed = test_db.db.categories.create(owner.id, "Doomed").await.unwrap();
    let kept = test_db.db.categories.create(owner.id, "Kept").await.unwrap();

    for n in 0..3 {
        test_db
            .db
            .sites
            .create(
                owner.id,
                new_site(doomed.id, &format!("http://gone{}.com", n), "gone"),
            )
            .await
            .unwrap();
    }
    let survivor = test_db
        .db
        .sites
        .create(owner.id, new_site(kept.id, "http://stays.com", "stays"))
        .await
        .unwrap();

    test_db.db.categories.delete(owner.id, doomed.id).await.unwrap();

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].sites.len(), 1);
    assert_eq!(listed[0].sites[0].id, survivor.id);

    test_db.cleanup().await;
}

// =============================================================================
// Reorder
// =============================================================================

#[tokio::test]
async fn test_reorder_categories_applies_all_assignments() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("reorder").await;

    let a = test_db.db.categories.create(owner.id, "A").await.unwrap();
    let b = test_db.db.categories.create(owner.id, "B").await.unwrap();
    let c = test_db.db.categories.create(owner.id, "C").await.unwrap();

    test_db
        .db
        .categories
        .reorder(
            owner.id,
            &[
                OrderAssignment { id: c.id, order: 0 },
                OrderAssignment { id: a.id, order: 1 },
                OrderAssignment { id: b.id, order: 2 },
            ],
        )
        .await
        .expect("reorder categories");

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|cat| cat.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B"]);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_reorder_gaps_are_kept_verbatim() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("gaps").await;

    let cat = test_db.db.categories.create(owner.id, "List").await.unwrap();
    let first = test_db
        .db
        .sites
        .create(owner.id, new_site(cat.id, "http://one.com", "one"))
        .await
        .unwrap();
    let second = test_db
        .db
        .sites
        .create(owner.id, new_site(cat.id, "http://two.com", "two"))
        .await
        .unwrap();

    // The sort key is a comparison value, not a dense index; sparse values
    // are stored as submitted.
    test_db
        .db
        .sites
        .reorder(
            owner.id,
            &[
                OrderAssignment {
                    id: second.id,
                    order: 10,
                },
                OrderAssignment {
                    id: first.id,
                    order: 20,
                },
            ],
        )
        .await
        .unwrap();

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    let orders: Vec<(Uuid, i32)> = listed[0]
        .sites
        .iter()
        .map(|s| (s.id, s.display_order))
        .collect();
    assert_eq!(orders, vec![(second.id, 10), (first.id, 20)]);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_empty_reorder_batch_is_a_no_op() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("empty").await;

    test_db.db.categories.reorder(owner.id, &[]).await.unwrap();
    test_db.db.sites.reorder(owner.id, &[]).await.unwrap();

    test_db.cleanup().await;
}

// =============================================================================
// Move
// =============================================================================

#[tokio::test]
async fn test_move_site_keeps_display_order() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("mover").await;

    let dev = test_db.db.categories.create(owner.id, "Dev").await.unwrap();
    let news = test_db.db.categories.create(owner.id, "News").await.unwrap();
    assert_eq!(dev.display_order, 0);
    assert_eq!(news.display_order, 1);

    let site = test_db
        .db
        .sites
        .create(owner.id, new_site(dev.id, "http://x.com", "X"))
        .await
        .unwrap();
    assert_eq!(site.display_order, 0);

    test_db
        .db
        .sites
        .move_to_category(owner.id, site.id, news.id)
        .await
        .expect("move site");

    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    assert!(listed[0].sites.is_empty(), "Dev should have zero sites");
    assert_eq!(listed[1].sites.len(), 1);
    assert_eq!(listed[1].sites[0].id, site.id);
    assert_eq!(listed[1].sites[0].display_order, 0);
    assert_eq!(listed[1].sites[0].title, "X");

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_move_site_into_populated_category_can_collide() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("collide").await;

    let from = test_db.db.categories.create(owner.id, "From").await.unwrap();
    let to = test_db.db.categories.create(owner.id, "To").await.unwrap();

    let resident = test_db
        .db
        .sites
        .create(owner.id, new_site(to.id, "http://resident.com", "resident"))
        .await
        .unwrap();
    let incoming = test_db
        .db
        .sites
        .create(owner.id, new_site(from.id, "http://incoming.com", "incoming"))
        .await
        .unwrap();

    test_db
        .db
        .sites
        .move_to_category(owner.id, incoming.id, to.id)
        .await
        .unwrap();

    // Both sit at order 0; creation order decides who lists first.
    let listed = test_db.db.categories.list_with_sites(owner.id).await.unwrap();
    let to_sites = &listed[1].sites;
    assert_eq!(to_sites.len(), 2);
    assert_eq!(to_sites[0].id, resident.id);
    assert_eq!(to_sites[1].id, incoming.id);
    assert_eq!(to_sites[0].display_order, 0);
    assert_eq!(to_sites[1].display_order, 0);

    test_db.cleanup().await;
}

// =============================================================================
// Rename
// =============================================================================

#[tokio::test]
async fn test_rename_returns_category_with_sites() {
    let test_db = TestDatabase::new().await;
    let owner = test_db.create_owner("rename").await;

    let cat = test_db.db.categories.create(owner.id, "Old").await.unwrap();
    test_db
        .db
        .sites
        .create(owner.id, new_site(cat.id, "http://a.com", "a"))
        .await
        .unwrap();

    let renamed = test_db
        .db
        .categories
        .rename(owner.id, cat.id, "New")
        .await
        .expect("rename category");

    assert_eq!(renamed.name, "New");
    assert_eq!(renamed.display_order, 0);
    assert_eq!(renamed.sites.len(), 1);

    test_db.cleanup().await;
}
