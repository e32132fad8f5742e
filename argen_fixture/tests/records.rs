//! The generated module, compiled and driven against a scripted connection.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, Once, PoisonError};

use argen_fixture::models::{Post, User};
use argen_fixture::records::{self, PostParams, UserParams};
use argen_runtime::query::Order;
use argen_runtime::{Connection, ExecResult, Row, RuntimeError, RuntimeResult, Value};
use assert_matches::assert_matches;

type Statement = (String, Vec<Value>);

/// Records every statement and answers queries with canned rows.
#[derive(Default)]
struct Script {
    statements: Mutex<Vec<Statement>>,
    rows: Mutex<Vec<Row>>,
    last_id: AtomicI64,
}

impl Connection for &'static Script {
    fn execute(&self, sql: &str, params: &[Value]) -> RuntimeResult<ExecResult> {
        self.statements.lock().unwrap().push((sql.to_string(), params.to_vec()));
        Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: Some(self.last_id.fetch_add(1, Ordering::SeqCst) + 1),
        })
    }

    fn query(&self, sql: &str, params: &[Value]) -> RuntimeResult<Vec<Row>> {
        self.statements.lock().unwrap().push((sql.to_string(), params.to_vec()));
        Ok(self.rows.lock().unwrap().clone())
    }
}

static SCRIPT: LazyLock<Script> = LazyLock::new(Script::default);
static SERIAL: Mutex<()> = Mutex::new(());

/// Installs the script once, then gives the caller exclusive use of it with
/// `rows` as every query's answer.
fn session(rows: Vec<Row>) -> MutexGuard<'static, ()> {
    static CONNECT: Once = Once::new();
    CONNECT.call_once(|| records::use_connection(&*SCRIPT).unwrap());

    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    SCRIPT.statements.lock().unwrap().clear();
    *SCRIPT.rows.lock().unwrap() = rows;
    SCRIPT.last_id.store(0, Ordering::SeqCst);
    guard
}

fn statements() -> Vec<Statement> {
    SCRIPT.statements.lock().unwrap().clone()
}

fn statement(sql: &str, params: Vec<Value>) -> Statement {
    (sql.to_string(), params)
}

fn user_row(id: i64, name: &str) -> Row {
    Row::new(vec![Value::Int(id), Value::from(name)])
}

fn ann() -> User {
    User {
        id: 7,
        name: "ann".into(),
    }
}

#[test]
fn test_compiled_module_matches_synthesizer() {
    let models = argen::extract_from_str(
        include_str!("../src/models.rs"),
        "models.rs",
        "crate::models",
        "+AR",
    )
    .unwrap();
    let expected = argen::Synthesizer::standard().synthesize(&models).unwrap();
    assert_eq!(include_str!(concat!(env!("OUT_DIR"), "/records.rs")), expected);
}

mod persistence {
    use super::*;

    #[test]
    fn test_save_inserts_new_then_updates_persistent() {
        let _session = session(vec![]);
        let mut user = User::build(UserParams {
            name: "ann".into(),
            ..Default::default()
        });
        assert!(user.is_new_record());

        user.save().unwrap();
        assert_eq!(user.id, 1);
        assert!(user.is_persistent());

        user.name = "bob".into();
        user.save().unwrap();

        assert_eq!(
            statements(),
            vec![
                statement("INSERT INTO User (name) VALUES (?)", vec![Value::from("ann")]),
                statement(
                    "UPDATE User SET name = ? WHERE id = ?",
                    vec![Value::from("bob"), Value::Int(1)]
                ),
            ]
        );
    }

    #[test]
    fn test_create_returns_validation_errors() {
        let _session = session(vec![]);
        let errors = User::create(UserParams::default()).unwrap_err();
        assert_eq!(
            errors.get("name").to_vec(),
            vec!["can't be blank", "is the wrong length (should be 3 characters)"]
        );
        assert!(statements().is_empty());
    }

    #[test]
    fn test_is_valid_collects_per_field() {
        let (valid, errors) = Post {
            votes: -1,
            ..Default::default()
        }
        .is_valid();
        assert!(!valid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("votes").to_vec(), vec!["must be greater than or equal to 0"]);

        let (valid, errors) = ann().is_valid();
        assert!(valid);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_update_copies_non_default_attributes() {
        let _session = session(vec![]);
        let mut user = ann();
        user.update(UserParams {
            name: "eve".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(
            statements(),
            vec![statement(
                "UPDATE User SET name = ? WHERE id = ?",
                vec![Value::from("eve"), Value::Int(7)]
            )]
        );
    }

    #[test]
    fn test_destroy_resets_primary_key() {
        let _session = session(vec![]);
        let destroyed = ann().destroy().unwrap();
        assert!(destroyed.is_new_record());
        assert_eq!(destroyed.name, "ann");
        assert_eq!(
            statements(),
            vec![statement("DELETE FROM User WHERE id = ?", vec![Value::Int(7)])]
        );
    }

    #[test]
    fn test_field_by_name() {
        let user = ann();
        assert_eq!(user.field_by_name("name"), Some(Value::from("ann")));
        assert_eq!(user.field_by_name("id"), Some(Value::Int(7)));
        assert_eq!(user.field_by_name("email"), None);
    }
}

mod finders {
    use super::*;

    #[test]
    fn test_first_and_last_order_by_primary_key() {
        let _session = session(vec![user_row(7, "ann")]);
        assert_eq!(User::first().unwrap(), ann());
        assert_eq!(User::last().unwrap(), ann());
        assert_eq!(
            statements(),
            vec![
                statement("SELECT id, name FROM User ORDER BY id ASC LIMIT 1", vec![]),
                statement("SELECT id, name FROM User ORDER BY id DESC LIMIT 1", vec![]),
            ]
        );
    }

    #[test]
    fn test_find_by_primary_key() {
        let _session = session(vec![user_row(7, "ann")]);
        assert_eq!(User::find(7).unwrap(), ann());
        assert_eq!(
            statements(),
            vec![statement("SELECT id, name FROM User WHERE id = ?", vec![Value::Int(7)])]
        );
    }

    #[test]
    fn test_find_without_rows() {
        let _session = session(vec![]);
        assert_matches!(User::find(1), Err(RuntimeError::NoRows));
    }

    #[test]
    fn test_where_chain() {
        let _session = session(vec![user_row(7, "ann"), user_row(8, "bob")]);
        let users = User::r#where("name", vec![Value::from("ann"), Value::from("bob")])
            .and("id > ?", vec![Value::Int(1)])
            .order("name", Order::Asc)
            .limit(2)
            .query()
            .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "bob");
        assert_eq!(
            statements(),
            vec![statement(
                "SELECT id, name FROM User WHERE name IN (?, ?) AND id > ? ORDER BY name ASC LIMIT 2",
                vec![Value::from("ann"), Value::from("bob"), Value::Int(1)]
            )]
        );
    }

    #[test]
    fn test_select_loads_only_chosen_columns() {
        let _session = session(vec![Row::new(vec![Value::from("ann")])]);
        let users = User::select(&["name"]).query().unwrap();
        assert_eq!(
            users,
            vec![User {
                id: 0,
                name: "ann".into(),
            }]
        );
        assert_eq!(statements(), vec![statement("SELECT name FROM User", vec![])]);
    }

    #[test]
    fn test_exists() {
        let _session = session(vec![Row::new(vec![Value::Int(1)])]);
        assert!(User::r#where("name", vec![Value::from("ann")]).exists().unwrap());
        assert_eq!(
            statements(),
            vec![statement(
                "SELECT 1 FROM User WHERE name = ? LIMIT 1",
                vec![Value::from("ann")]
            )]
        );
    }
}

mod scopes {
    use super::*;

    #[test]
    fn test_scope_dispatch_on_model_and_relation() {
        let _session = session(vec![]);
        User::scope("Recent", |relation, args| {
            let relation = relation.order("id", Order::Desc);
            match args.first() {
                Some(Value::Int(n)) => relation.limit(u64::try_from(*n).unwrap_or(0)),
                _ => relation,
            }
        });

        User::recent(&[Value::Int(2)]).unwrap().query().unwrap();
        User::r#where("name", vec![Value::from("ann")])
            .recent(&[])
            .unwrap()
            .query()
            .unwrap();

        assert_eq!(
            statements(),
            vec![
                statement("SELECT id, name FROM User ORDER BY id DESC LIMIT 2", vec![]),
                statement(
                    "SELECT id, name FROM User WHERE name = ? ORDER BY id DESC",
                    vec![Value::from("ann")]
                ),
            ]
        );
    }

    #[test]
    fn test_unregistered_scope() {
        assert_matches!(
            User::popular(&[]),
            Err(RuntimeError::UnknownScope(name)) if name == "Popular"
        );
    }
}

mod associations {
    use super::*;

    #[test]
    fn test_has_many_filters_on_owner_column() {
        let _session = session(vec![Row::new(vec![Value::Int(3), Value::Int(7), Value::Int(2)])]);
        let posts = ann().posts().unwrap();
        assert_eq!(
            posts,
            vec![Post {
                id: 3,
                user_id: 7,
                votes: 2,
            }]
        );
        assert_eq!(
            statements(),
            vec![statement(
                "SELECT id, user_id, votes FROM Post WHERE User_id = ?",
                vec![Value::Int(7)]
            )]
        );
    }

    #[test]
    fn test_belongs_to_loads_owner() {
        let _session = session(vec![user_row(7, "ann")]);
        let post = Post {
            id: 3,
            user_id: 7,
            votes: 0,
        };
        assert_eq!(post.user().unwrap(), ann());
        assert_eq!(
            statements(),
            vec![statement(
                "SELECT id, name FROM User WHERE id = ? ORDER BY id ASC LIMIT 1",
                vec![Value::Int(7)]
            )]
        );
    }

    #[test]
    fn test_build_sets_foreign_key() {
        let post = ann().build_post(PostParams {
            votes: 2,
            ..Default::default()
        });
        assert_eq!(
            post,
            Post {
                id: 0,
                user_id: 7,
                votes: 2,
            }
        );
    }

    #[test]
    fn test_joins() {
        let (sql, _) = User::all().joins_posts().statement().build();
        assert_eq!(sql, "SELECT id, name FROM User INNER JOIN Post ON Post.User_id = User.id");
        let (sql, _) = Post::all().joins_user().statement().build();
        assert_eq!(
            sql,
            "SELECT id, user_id, votes FROM Post INNER JOIN User ON User.id = Post.user_id"
        );
    }
}
