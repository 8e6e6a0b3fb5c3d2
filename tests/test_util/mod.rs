use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::panic;
use std::sync::Arc;
use todo_rest::{SharedData, app_env, build_router, db, persistence, ui};
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let mut rng = thread_rng();
        let db_id: u32 = rng.gen_range(10_000..99_999);
        let db_name = format!("test_db_{}", db_id);
        let mut conn = PgConnection::connect(base_url).await?;

        sqlx::query(format!("CREATE DATABASE {}", db_name).as_str())
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: String::from(base_url),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    /// Drops the database. Failures are only reported so they don't hide the test's own result.
    async fn destroy(self) {
        let mut conn = match PgConnection::connect(&self.base_url).await {
            Ok(cxn) => cxn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to database to drop test database {}, please remove it manually. Error: {}",
                    self.db_name, conn_err
                );
                return;
            }
        };

        let drop_statement = format!("DROP DATABASE {} WITH (FORCE)", self.db_name);
        let drop_result = sqlx::query(drop_statement.as_str())
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {}",
                self.db_name, db_err
            );
        }
    }
}

/// Creates a throwaway database with the todo table for a test, then drops it once the test
/// finishes, even if the test panics.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    F: FnOnce(PgPool) -> R,
    R: Future<Output = ()> + Send + 'static,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let pg_connection_base_url = env::var(app_env::TEST_DB_URL)
            .expect("TEST_DB_URL must be the base postgres connection string");
        let test_db = match TestDatabase::create(&pg_connection_base_url).await {
            Ok(tdb) => tdb,
            Err(db_err) => panic!("Failed to start test database: {}", db_err),
        };

        let sqlx_pool = db::connect_sqlx(&test_db.url())
            .await
            .expect("Could not connect to the test database");
        db::ensure_schema(&sqlx_pool)
            .await
            .expect("Could not create the todo table");

        let test_result = tokio::spawn(test_fn(sqlx_pool.clone())).await;
        sqlx_pool.close().await;
        test_db.destroy().await;

        if let Err(join_err) = test_result {
            if join_err.is_panic() {
                panic::resume_unwind(join_err.into_panic());
            }
            panic!("Test task did not finish: {join_err}");
        }
    });
}

/// Builds the full application router on top of the given pool
pub fn app(db: PgPool) -> Router {
    let templates = ui::PageTemplates::load().expect("Page templates should load");
    let shared_data = SharedData::new(persistence::ExternalConnectivity::new(db), templates);

    build_router(Arc::new(shared_data))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router should always produce a response")
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("Request should be valid")
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("Request should be valid")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Request should be valid")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}
