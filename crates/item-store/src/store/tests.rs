//! Store Tests
//!
//! ItemList and ItemStore against InMemoryCollection + MemoryCache.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::domain::{Draft, ItemFields, LocalKey, Schema, StoreError, SyncState, ValidationError};
    use crate::repository::{snapshot, InMemoryCollection, LocalCache, MemoryCache, RemoteCollection};
    use crate::store::{
        actions, settle, CreateOutcome, FollowUp, ItemList, ItemStore, ListAccess, LoadOutcome, NoticeKind,
        SyncOutcome,
    };

    type TestStore = ItemStore<InMemoryCollection, MemoryCache>;

    fn setup_store(schema: Schema) -> TestStore {
        let remote = InMemoryCollection::new(schema.clone());
        ItemStore::new(ItemList::new(schema, 3, "todos"), remote, MemoryCache::new())
    }

    async fn seeded_store(titles: &[&str]) -> TestStore {
        let schema = Schema::todos();
        let remote = InMemoryCollection::with_rows(
            schema.clone(),
            titles.iter().map(|t| ItemFields::titled(*t)),
        );
        let mut store = ItemStore::new(ItemList::new(schema, 3, "todos"), remote, MemoryCache::new());
        assert!(store.load().await.is_remote());
        store
    }

    fn titles(list: &ItemList) -> Vec<String> {
        list.items().iter().map(|i| i.fields.title.clone()).collect()
    }

    // ========================
    // Create
    // ========================

    #[test]
    fn test_create_is_visible_before_remote_resolves() {
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");

        let ticket = list.begin_create(Draft::titled("Buy milk"), &cache).expect("valid draft");

        assert_eq!(list.len(), 1);
        let item = &list.items()[0];
        assert_eq!(item.fields.title, "Buy milk");
        assert_eq!(item.sync, SyncState::Pending);
        assert_eq!(item.key, ticket.key());

        let cached = snapshot::load(&cache, "todos").expect("snapshot written");
        assert_eq!(cached, list.items());
    }

    #[tokio::test]
    async fn test_create_reconciles_with_server_id() {
        let mut store = setup_store(Schema::todos());
        store.remote().set_next_id(42);

        let outcome = store.create(Draft::titled("Buy milk")).await.expect("valid draft");

        assert!(matches!(outcome, CreateOutcome::Reconciled { id: 42, .. }));
        let items = store.list().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].remote_id(), Some(42));
        assert_eq!(items[0].fields.title, "Buy milk");
        assert!(items[0].created_at.is_some());
        assert!(store.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_create_stays_local_when_remote_fails() {
        let mut store = setup_store(Schema::todos());
        store.remote().set_offline(true);

        let outcome = store.create(Draft::titled("Buy milk")).await.expect("valid draft");

        assert!(matches!(outcome, CreateOutcome::LocalOnly { .. }));
        assert_eq!(titles(store.list()), vec!["Buy milk"]);
        assert!(store.list().items()[0].is_pending());

        let notices = store.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Warning);

        let cached = snapshot::load(store.cache(), "todos").expect("snapshot");
        assert_eq!(cached.len(), 1);
        assert!(cached[0].is_pending());
    }

    #[tokio::test]
    async fn test_empty_label_rejected_without_mutation() {
        let mut store = seeded_store(&["a"]).await;
        let calls = store.remote().calls();
        let before = store.list().clone();

        let err = store.create(Draft::titled("   ")).await.unwrap_err();

        assert_eq!(err, StoreError::Validation(ValidationError::EmptyLabel("Text".into())));
        assert_eq!(store.list(), &before);
        assert_eq!(store.remote().calls(), calls);
    }

    #[tokio::test]
    async fn test_entities_require_amount() {
        let mut store = setup_store(Schema::entities());
        let err = store.create(Draft::titled("Rent")).await.unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::MissingAmount));
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_insert_position_follows_schema() {
        let mut todos = seeded_store(&["old"]).await;
        todos.create(Draft::titled("new")).await.expect("create");
        assert_eq!(titles(todos.list()), vec!["new", "old"]);

        let mut entities = setup_store(Schema::entities());
        for title in ["first", "second"] {
            let mut draft = Draft::titled(title);
            draft.fields.amount = Some(1.0);
            entities.create(draft).await.expect("create");
        }
        assert_eq!(titles(entities.list()), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_create_resets_to_first_page() {
        let mut store = seeded_store(&["a", "b", "c", "d"]).await;
        store.paginate(2);
        assert_eq!(store.list().page(), 2);

        store.create(Draft::titled("e")).await.expect("create");
        assert_eq!(store.list().page(), 1);
    }

    // ========================
    // Load
    // ========================

    #[tokio::test]
    async fn test_load_replaces_items_and_writes_cache() {
        let store = seeded_store(&["a", "b"]).await;
        assert_eq!(titles(store.list()), vec!["b", "a"]);

        let cached = snapshot::load(store.cache(), "todos").expect("snapshot");
        assert_eq!(cached, store.list().items());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_cache() {
        let schema = Schema::todos();
        let remote = InMemoryCollection::new(schema.clone());
        remote.set_offline(true);
        let cache = MemoryCache::with_entry("todos", r#"[{"id":1,"title":"X"}]"#);
        let mut store = ItemStore::new(ItemList::new(schema, 3, "todos"), remote, cache);

        let outcome = store.load().await;

        assert!(matches!(outcome, LoadOutcome::Cached { count: 1, .. }));
        let items = store.list().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].remote_id(), Some(1));
        assert_eq!(items[0].fields.title, "X");
        assert_eq!(store.take_notices().len(), 1);
    }

    #[tokio::test]
    async fn test_load_without_cache_defaults_to_empty() {
        let mut store = seeded_store(&["a"]).await;
        let schema = Schema::todos();
        let remote = InMemoryCollection::new(schema.clone());
        remote.set_offline(true);
        let mut offline = ItemStore::new(ItemList::new(schema, 3, "todos"), remote, MemoryCache::new());

        assert!(matches!(offline.load().await, LoadOutcome::Empty { .. }));
        assert!(offline.list().is_empty());
        assert_eq!(offline.list().page_count(), 1);

        // a corrupt snapshot counts as nothing cached
        store.cache().set("todos", "{not json").expect("set");
        store.remote().set_offline(true);
        assert!(matches!(store.load().await, LoadOutcome::Empty { .. }));
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_cached_keys_do_not_collide_with_new_items() {
        let cache = MemoryCache::with_entry("todos", r#"[{"id":1,"title":"X","key":1},{"id":null,"title":"Y","key":1}]"#);
        let remote = InMemoryCollection::new(Schema::todos());
        remote.set_offline(true);
        let mut store = ItemStore::new(ItemList::new(Schema::todos(), 3, "todos"), remote, cache);
        store.load().await;

        store.create(Draft::titled("Z")).await.expect("create");
        let mut keys: Vec<LocalKey> = store.list().items().iter().map(|i| i.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[tokio::test]
    async fn test_filtered_load() {
        let mut store = seeded_store(&["Buy milk", "Walk dog"]).await;
        store.set_filter(crate::domain::ListFilter {
            search: "MILK".into(),
            ..Default::default()
        });
        store.load().await;
        assert_eq!(titles(store.list()), vec!["Buy milk"]);
    }

    // ========================
    // Pagination
    // ========================

    #[tokio::test]
    async fn test_second_page_of_four() {
        let mut store = seeded_store(&["a", "b", "c", "d"]).await;

        store.paginate(2);

        assert_eq!(store.list().page_count(), 2);
        let visible = store.list().visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible, &store.list().items()[3..4]);
    }

    #[tokio::test]
    async fn test_paginate_is_idempotent() {
        let mut store = seeded_store(&["a", "b", "c", "d", "e"]).await;
        store.paginate(2);
        let first = store.list().visible().to_vec();
        store.paginate(2);
        assert_eq!(store.list().visible(), first.as_slice());
    }

    #[tokio::test]
    async fn test_paginate_clamps() {
        let mut store = seeded_store(&["a", "b", "c", "d"]).await;
        store.paginate(9);
        assert_eq!(store.list().page(), 2);
        store.paginate(0);
        assert_eq!(store.list().page(), 1);
    }

    #[tokio::test]
    async fn test_removing_last_item_on_last_page_steps_back() {
        let mut store = seeded_store(&["a", "b", "c", "d"]).await;
        store.paginate(2);
        let last = store.list().visible()[0].key;

        store.remove(last).await.expect("remove");

        assert_eq!(store.list().page(), 1);
        assert_eq!(store.list().visible().len(), 3);
    }

    #[tokio::test]
    async fn test_removing_only_item_stays_on_page_one() {
        let mut store = seeded_store(&["a"]).await;
        let key = store.list().items()[0].key;
        store.remove(key).await.expect("remove");
        assert_eq!(store.list().page(), 1);
        assert!(store.list().visible().is_empty());
    }

    // ========================
    // Update
    // ========================

    #[tokio::test]
    async fn test_update_with_empty_label_changes_nothing() {
        let mut store = seeded_store(&["a"]).await;
        let key = store.list().items()[0].key;
        let before = store.list().clone();
        let calls = store.remote().calls();

        let err = store.update(key, Draft::titled("")).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyLabel(_))));
        assert_eq!(store.list(), &before);
        assert_eq!(store.remote().calls(), calls);
    }

    #[tokio::test]
    async fn test_update_persisted_item() {
        let mut store = seeded_store(&["a"]).await;
        let key = store.list().items()[0].key;

        let outcome = store.update(key, Draft::titled("a (edited)")).await.expect("update");

        assert_eq!(outcome, SyncOutcome::Confirmed);
        assert_eq!(titles(store.list()), vec!["a (edited)"]);
        assert_eq!(store.remote().records()[0].fields.title, "a (edited)");
    }

    #[tokio::test]
    async fn test_update_failure_keeps_local_edit() {
        let mut store = seeded_store(&["a"]).await;
        let key = store.list().items()[0].key;
        store.remote().set_offline(true);

        let outcome = store.update(key, Draft::titled("b")).await.expect("update");

        assert!(matches!(outcome, SyncOutcome::Failed { .. }));
        assert_eq!(titles(store.list()), vec!["b"]);
        assert_eq!(store.take_notices().len(), 1);
        let cached = snapshot::load(store.cache(), "todos").expect("snapshot");
        assert_eq!(cached[0].fields.title, "b");
    }

    #[tokio::test]
    async fn test_update_pending_item_stays_local() {
        let mut store = setup_store(Schema::todos());
        store.remote().set_offline(true);
        store.create(Draft::titled("a")).await.expect("create");
        store.remote().set_offline(false);
        let calls = store.remote().calls();
        let key = store.list().items()[0].key;

        let outcome = store.update(key, Draft::titled("b")).await.expect("update");

        assert_eq!(outcome, SyncOutcome::LocalOnly);
        assert_eq!(store.remote().calls(), calls);
        assert_eq!(titles(store.list()), vec!["b"]);
    }

    #[tokio::test]
    async fn test_update_unknown_key() {
        let mut store = setup_store(Schema::todos());
        let err = store.update(LocalKey(99), Draft::titled("x")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // ========================
    // Remove
    // ========================

    #[tokio::test]
    async fn test_remove_deletes_remotely() {
        let mut store = seeded_store(&["a", "b"]).await;
        let key = store.list().items()[0].key;

        let outcome = store.remove(key).await.expect("remove");

        assert_eq!(outcome, SyncOutcome::Confirmed);
        assert_eq!(titles(store.list()), vec!["a"]);
        assert_eq!(store.remote().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_never_rolled_back() {
        let mut store = seeded_store(&["a"]).await;
        let key = store.list().items()[0].key;
        store.remote().set_offline(true);

        let outcome = store.remove(key).await.expect("remove");

        assert!(matches!(outcome, SyncOutcome::Failed { .. }));
        assert!(store.list().is_empty());
        assert_eq!(store.remote().len(), 1);
        assert_eq!(store.take_notices().len(), 1);
        assert!(snapshot::load(store.cache(), "todos").expect("snapshot").is_empty());
    }

    // ========================
    // Overlapping operations
    // ========================

    #[tokio::test]
    async fn test_delete_during_pending_create_removes_server_row() {
        let remote = InMemoryCollection::new(Schema::todos());
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");

        let ticket = list.begin_create(Draft::titled("short-lived"), &cache).expect("create");
        assert_eq!(list.begin_remove(ticket.key(), &cache).expect("remove"), None);

        let result = remote.insert(ticket.fields()).await;
        let outcome = list.finish_create(ticket, result, &cache);

        assert_eq!(outcome, CreateOutcome::Orphaned { id: 1 });
        assert!(list.is_empty());
        let follow_up = outcome.follow_up().expect("delete follow-up");
        assert_eq!(follow_up, FollowUp::Delete { id: 1 });
        assert_eq!(settle(&remote, &follow_up).await, SyncOutcome::Confirmed);
        assert!(remote.is_empty());
    }

    #[tokio::test]
    async fn test_edit_during_pending_create_is_pushed_after() {
        let remote = InMemoryCollection::new(Schema::todos());
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");

        let ticket = list.begin_create(Draft::titled("draft"), &cache).expect("create");
        let key = ticket.key();
        assert_eq!(list.begin_update(key, Draft::titled("final"), &cache).expect("update"), None);

        let result = remote.insert(ticket.fields()).await;
        let outcome = list.finish_create(ticket, result, &cache);

        let item = list.get(key).expect("still listed");
        assert_eq!(item.sync, SyncState::Persisted(1));
        assert_eq!(item.fields.title, "final");
        let follow_up = outcome.follow_up().expect("update follow-up");
        settle(&remote, &follow_up).await;
        assert_eq!(remote.records()[0].fields.title, "final");
    }

    #[tokio::test]
    async fn test_reload_during_pending_create() {
        let remote = InMemoryCollection::new(Schema::todos());
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");
        let query = Schema::todos().query(&Default::default());

        // reload lands before the insert: the local item is kept and reconciled
        let ticket = list.begin_create(Draft::titled("a"), &cache).expect("create");
        list.apply_loaded(remote.select(&query).await, &cache);
        assert_eq!(titles(&list), vec!["a"]);
        let result = remote.insert(ticket.fields()).await;
        let outcome = list.finish_create(ticket, result, &cache);
        assert!(matches!(outcome, CreateOutcome::Reconciled { id: 1, .. }));
        assert_eq!(list.len(), 1);

        // reload lands after the insert: the listed copy is folded into the local one
        let ticket = list.begin_create(Draft::titled("b"), &cache).expect("create");
        let key = ticket.key();
        let result = remote.insert(ticket.fields()).await;
        list.apply_loaded(remote.select(&query).await, &cache);
        assert_eq!(list.len(), 3);
        let outcome = list.finish_create(ticket, result, &cache);
        assert_eq!(outcome, CreateOutcome::Reconciled { key, id: 2 });
        assert_eq!(list.len(), 2);
        assert_eq!(list.key_of_remote(2), Some(key));
    }

    #[tokio::test]
    async fn test_create_resolving_after_cache_fallback() {
        let remote = InMemoryCollection::new(Schema::todos());
        let offline = InMemoryCollection::new(Schema::todos());
        offline.set_offline(true);
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");
        let query = Schema::todos().query(&Default::default());

        // the fallback snapshot predates the local item
        let ticket = list.begin_create(Draft::titled("a"), &cache).expect("create");
        let stale = MemoryCache::with_entry("todos", "[]");
        list.apply_loaded(offline.select(&query).await, &stale);
        assert!(list.is_empty());
        let result = remote.insert(ticket.fields()).await;
        let outcome = list.finish_create(ticket, result, &cache);
        assert!(matches!(outcome, CreateOutcome::Adopted { id: 1, .. }));
        assert_eq!(titles(&list), vec!["a"]);

        // the fallback snapshot already lists the created row
        let ticket = list.begin_create(Draft::titled("b"), &cache).expect("create");
        let result = remote.insert(ticket.fields()).await;
        let stale = MemoryCache::with_entry("todos", r#"[{"id":2,"title":"b"}]"#);
        list.apply_loaded(offline.select(&query).await, &stale);
        let outcome = list.finish_create(ticket, result, &cache);
        assert_eq!(outcome, CreateOutcome::AlreadyListed { id: 2 });
        assert_eq!(titles(&list), vec!["b"]);
    }

    #[tokio::test]
    async fn test_delete_during_pending_create_drops_reloaded_row() {
        let remote = InMemoryCollection::new(Schema::todos());
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::todos(), 3, "todos");
        let query = Schema::todos().query(&Default::default());

        let ticket = list.begin_create(Draft::titled("short-lived"), &cache).expect("create");
        let result = remote.insert(ticket.fields()).await;
        list.apply_loaded(remote.select(&query).await, &cache);
        assert_eq!(list.len(), 2);
        assert_eq!(list.begin_remove(ticket.key(), &cache).expect("remove"), None);

        let outcome = list.finish_create(ticket, result, &cache);

        assert_eq!(outcome, CreateOutcome::Orphaned { id: 1 });
        assert!(list.is_empty());
        assert!(snapshot::load(&cache, "todos").expect("snapshot").is_empty());
        let follow_up = outcome.follow_up().expect("delete follow-up");
        assert_eq!(settle(&remote, &follow_up).await, SyncOutcome::Confirmed);
        assert!(remote.is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_of_deleted_item_is_dropped() {
        let cache = MemoryCache::new();
        let remote = InMemoryCollection::new(Schema::todos());
        remote.set_offline(true);
        let mut list = ItemList::new(Schema::todos(), 3, "todos");

        let ticket = list.begin_create(Draft::titled("gone"), &cache).expect("create");
        list.begin_remove(ticket.key(), &cache).expect("remove");
        let result = remote.insert(ticket.fields()).await;

        assert_eq!(list.finish_create(ticket, result, &cache), CreateOutcome::Dropped);
        assert!(CreateOutcome::Dropped.notice().is_none());
        assert_eq!(list.tombstone_count(), 0);
    }

    #[tokio::test]
    async fn test_removing_local_only_item_leaves_no_tombstone() {
        let mut store = setup_store(Schema::todos());
        store.remote().set_offline(true);
        store.create(Draft::titled("gone")).await.expect("create");
        let key = store.list().items()[0].key;

        assert_eq!(store.remove(key).await.expect("remove"), SyncOutcome::LocalOnly);
        assert!(store.list().is_empty());
        assert_eq!(store.list().tombstone_count(), 0);

        // same for a local item restored from the cache
        let cache = MemoryCache::with_entry("todos", r#"[{"id":null,"title":"Y"}]"#);
        let remote = InMemoryCollection::new(Schema::todos());
        remote.set_offline(true);
        let mut restored = ItemStore::new(ItemList::new(Schema::todos(), 3, "todos"), remote, cache);
        restored.load().await;
        let key = restored.list().items()[0].key;

        assert_eq!(restored.remove(key).await.expect("remove"), SyncOutcome::LocalOnly);
        assert_eq!(restored.list().tombstone_count(), 0);
    }

    // ========================
    // Resync
    // ========================

    #[tokio::test]
    async fn test_local_item_is_sent_on_next_successful_load() {
        let mut store = seeded_store(&["old"]).await;
        store.remote().set_offline(true);
        let outcome = store.create(Draft::titled("Buy milk")).await.expect("create");
        assert!(matches!(outcome, CreateOutcome::LocalOnly { .. }));
        store.take_notices();

        // still offline: the cached copy keeps it
        assert!(matches!(store.load().await, LoadOutcome::Cached { count: 2, .. }));
        assert_eq!(titles(store.list()), vec!["Buy milk", "old"]);
        store.take_notices();

        store.remote().set_offline(false);
        assert!(store.load().await.is_remote());

        assert_eq!(titles(store.list()), vec!["Buy milk", "old"]);
        assert!(store.list().items().iter().all(|item| !item.is_pending()));
        assert_eq!(store.remote().len(), 2);
        let cached = snapshot::load(store.cache(), "todos").expect("snapshot");
        assert_eq!(cached, store.list().items());
        let notices = store.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Info);
        assert!(notices[0].message.contains("Synced 1"));
    }

    #[tokio::test]
    async fn test_successful_load_keeps_local_items_in_place() {
        let remote = InMemoryCollection::with_rows(Schema::entities(), [ItemFields::titled("row")]);
        let cache = MemoryCache::new();
        let mut list = ItemList::new(Schema::entities(), 3, "entities");
        let mut draft = Draft::titled("local");
        draft.fields.amount = Some(2.0);

        let ticket = list.begin_create(draft, &cache).expect("create");
        remote.set_offline(true);
        let result = remote.insert(ticket.fields()).await;
        list.finish_create(ticket, result, &cache);
        remote.set_offline(false);

        let query = Schema::entities().query(&Default::default());
        list.apply_loaded(remote.select(&query).await, &cache);

        assert_eq!(titles(&list), vec!["row", "local"]);
        assert!(list.items()[1].is_pending());
        assert_eq!(snapshot::load(&cache, "entities").expect("snapshot"), list.items());

        let tickets = list.begin_resync();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].fields().title, "local");
        // already in flight
        assert!(list.begin_resync().is_empty());
    }

    struct SharedList(Rc<RefCell<ItemList>>);

    impl ListAccess for SharedList {
        fn with_list<T>(&mut self, f: impl FnOnce(&mut ItemList) -> T) -> T {
            f(&mut self.0.borrow_mut())
        }
    }

    #[tokio::test]
    async fn test_actions_run_against_shared_list() {
        let list = Rc::new(RefCell::new(ItemList::new(Schema::todos(), 3, "todos")));
        let remote = InMemoryCollection::new(Schema::todos());
        let cache = MemoryCache::new();
        let mut notices = Vec::new();

        let outcome = actions::create(&mut SharedList(list.clone()), &remote, &cache, Draft::titled("a"), &mut notices)
            .await
            .expect("create");
        assert!(matches!(outcome, CreateOutcome::Reconciled { id: 1, .. }));

        let key = list.borrow().items()[0].key;
        remote.set_offline(true);
        let item = actions::details(&mut SharedList(list.clone()), &remote, key, &mut notices)
            .await
            .expect("listed");
        assert_eq!(item.fields.title, "a");
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Warning);
    }

    // ========================
    // Snapshots
    // ========================

    #[tokio::test]
    async fn test_reachable_state_round_trips_through_json() {
        let mut store = seeded_store(&["a", "b"]).await;
        store.remote().set_offline(true);
        store.create(Draft::titled("local")).await.expect("create");
        let key = store.list().items()[1].key;
        store.update(key, Draft::titled("edited")).await.expect("update");

        let items = store.list().items().to_vec();
        let json = serde_json::to_string(&items).expect("serialize");
        let restored: Vec<crate::domain::Item> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, items);
    }
}
