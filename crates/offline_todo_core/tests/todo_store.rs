use offline_todo_core::{
    load_todos, save_todos, ErrorKind, KeyValueStore, ManualClock, MemoryKvStore, Todo,
    TodoError, TodoStore, TodoValidationError, TODOS_KEY,
};

const T0: i64 = 1_700_000_000_000;

fn store_on(kv: &MemoryKvStore) -> (TodoStore<&MemoryKvStore, ManualClock>, ManualClock) {
    let clock = ManualClock::starting_at(T0);
    (TodoStore::with_clock(kv, clock.clone()), clock)
}

fn persisted(kv: &MemoryKvStore) -> Vec<Todo> {
    serde_json::from_str(&kv.get(TODOS_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn add_appends_open_todo_and_persists_full_list() {
    let kv = MemoryKvStore::new();
    let (mut store, clock) = store_on(&kv);

    let first = store.add("  Buy milk ").unwrap();
    clock.advance(5);
    let second = store.add("Walk dog").unwrap();

    assert_eq!(first, Todo::new(T0, "Buy milk"));
    assert!(!second.completed);
    assert_eq!(store.len(), 2);
    assert_eq!(persisted(&kv), store.todos().to_vec());
}

#[test]
fn blank_text_never_grows_the_list() {
    let kv = MemoryKvStore::new();
    let (mut store, _) = store_on(&kv);

    for input in ["", "   ", "\t\n"] {
        let err = store.add(input).unwrap_err();
        assert!(matches!(
            err,
            TodoError::Validation(TodoValidationError::EmptyText)
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert!(store.is_empty());
    assert_eq!(kv.get(TODOS_KEY).unwrap(), None);
}

#[test]
fn texts_stay_unique_ignoring_case_across_add_and_edit() {
    let kv = MemoryKvStore::new();
    let (mut store, clock) = store_on(&kv);
    let milk = store.add("Buy milk").unwrap();
    clock.advance(1);
    let bread = store.add("Buy bread").unwrap();

    let err = store.add("BUY MILK").unwrap_err();
    assert!(matches!(err, TodoError::Duplicate(_)));
    assert_eq!(err.to_string(), "This todo already exists!");

    let err = store.edit(bread.id, " buy Milk ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);

    // Re-casing a todo's own text is not a collision.
    let edited = store.edit(milk.id, "BUY MILK").unwrap();
    assert_eq!(edited.text, "BUY MILK");

    let todos = store.todos();
    for a in todos {
        for b in todos {
            if a.id != b.id {
                assert_ne!(a.text.to_lowercase(), b.text.to_lowercase());
            }
        }
    }
}

#[test]
fn edit_rejects_blank_and_unknown_ids() {
    let kv = MemoryKvStore::new();
    let (mut store, _) = store_on(&kv);
    let todo = store.add("Read book").unwrap();

    let err = store.edit(todo.id, "  ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Todo text cannot be empty!");

    let err = store.edit(todo.id + 1, "Other").unwrap_err();
    assert!(matches!(err, TodoError::NotFound(id) if id == todo.id + 1));

    assert_eq!(store.get(todo.id).unwrap().text, "Read book");
}

#[test]
fn toggle_twice_restores_completion() {
    let kv = MemoryKvStore::new();
    let (mut store, _) = store_on(&kv);
    let todo = store.add("Stretch").unwrap();

    assert_eq!(store.toggle(todo.id).unwrap(), Some(true));
    assert!(persisted(&kv)[0].completed);
    assert_eq!(store.toggle(todo.id).unwrap(), Some(false));
    assert!(!store.get(todo.id).unwrap().completed);
    assert_eq!(store.toggle(todo.id + 99).unwrap(), None);
}

#[test]
fn remove_is_idempotent() {
    let kv = MemoryKvStore::new();
    let (mut store, _) = store_on(&kv);
    let todo = store.add("Call mom").unwrap();

    assert_eq!(store.remove(todo.id).unwrap(), Some(todo.clone()));
    assert_eq!(store.remove(todo.id).unwrap(), None);
    assert!(store.is_empty());
    assert!(persisted(&kv).is_empty());
}

#[test]
fn failed_write_leaves_memory_and_storage_untouched() {
    let kv = MemoryKvStore::new();
    let (mut store, _) = store_on(&kv);
    let todo = store.add("Pay rent").unwrap();

    kv.set_fail_writes(true);
    let err = store.add("Pay taxes").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(store.toggle(todo.id).is_err());
    assert!(store.remove(todo.id).is_err());

    assert_eq!(store.todos(), &[todo.clone()]);
    assert_eq!(persisted(&kv), vec![todo]);
}

#[test]
fn save_then_load_roundtrips_well_formed_lists() {
    let kv = MemoryKvStore::new();
    let todos = vec![
        Todo {
            id: 1,
            text: "alpha".to_string(),
            completed: true,
        },
        Todo::new(2, "beta"),
        Todo::new(2_000_000_000_000, "γάμμα"),
    ];

    save_todos(&kv, &todos).unwrap();
    assert_eq!(load_todos(&kv).unwrap(), todos);

    save_todos(&kv, &load_todos(&kv).unwrap()).unwrap();
    assert_eq!(load_todos(&kv).unwrap(), todos);
}

#[test]
fn persisted_layout_uses_plain_field_names() {
    let kv = MemoryKvStore::new();
    save_todos(&kv, &[Todo::new(7, "x")]).unwrap();

    let value: serde_json::Value = serde_json::from_str(&kv.get(TODOS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "id": 7, "text": "x", "completed": false }])
    );
}

#[test]
fn malformed_persisted_data_loads_as_empty_list() {
    for raw in ["not json", "{\"id\":1}", "[{\"id\":\"x\"}]", ""] {
        let kv = MemoryKvStore::with_entries([(TODOS_KEY, raw)]);
        let store = TodoStore::load(&kv).unwrap();
        assert!(store.is_empty(), "input {raw:?} should fail closed");
    }
}

#[test]
fn failed_read_is_an_error_not_an_empty_list() {
    let kv = MemoryKvStore::with_entries([(
        TODOS_KEY,
        r#"[{"id":1,"text":"a","completed":false}]"#,
    )]);
    kv.set_fail_reads(true);

    let err = load_todos(&kv).unwrap_err();
    assert!(err.to_string().contains("unavailable"));
    assert!(TodoStore::load(&kv).is_err());

    kv.set_fail_reads(false);
    let mut store = TodoStore::load(&kv).unwrap();
    kv.set_fail_reads(true);
    assert!(store.reload().is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn load_drops_entries_that_break_list_invariants() {
    let kv = MemoryKvStore::with_entries([(
        TODOS_KEY,
        r#"[
            {"id":1,"text":"Milk","completed":false},
            {"id":1,"text":"Bread","completed":false},
            {"id":2,"text":"  milk ","completed":true},
            {"id":3,"text":"   ","completed":false},
            {"id":4,"text":"Eggs","completed":true}
        ]"#,
    )]);

    let todos = load_todos(&kv).unwrap();
    assert_eq!(
        todos,
        vec![
            Todo::new(1, "Milk"),
            Todo {
                id: 4,
                text: "Eggs".to_string(),
                completed: true,
            },
        ]
    );
}

#[test]
fn load_picks_up_existing_list_and_ids_keep_increasing() {
    let kv = MemoryKvStore::with_entries([(
        TODOS_KEY,
        r#"[{"id":5000,"text":"old","completed":true}]"#,
    )]);
    let mut store = TodoStore::load_with_clock(&kv, ManualClock::starting_at(10)).unwrap();

    assert_eq!(store.completed_count(), 1);
    let added = store.add("new").unwrap();
    assert_eq!(added.id, 5001);
}
