use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use migration::MigratorTrait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::cors::build_cors;
use server::routes::{self, auth::{Claims, ServerAuthConfig, ServerState}, RouterOptions};
use service::assets::mock::MockAssetStore;
use service::catalog::{repo::SeaOrmServiceRepository, ServiceManager};
use service::identity::Role;

const SECRET: &str = "e2e-secret";

struct TestApp {
    base_url: String,
    db: sea_orm::DatabaseConnection,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Ensure models prefer env over config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let manager = ServiceManager::new(
        Arc::new(SeaOrmServiceRepository::new(db.clone())),
        Arc::new(MockAssetStore::default()),
    );
    let state = ServerState { manager: Arc::new(manager), auth: ServerAuthConfig { jwt_secret: SECRET.into() } };

    let scratch = format!("target/test-data/{}", Uuid::new_v4());
    let opts = RouterOptions {
        uploads_dir: format!("{scratch}/uploads"),
        public_dir: format!("{scratch}/public"),
        max_upload_bytes: 1024 * 1024,
    };
    let app: Router = routes::build_router(state, build_cors(&configs::CorsConfig::default()), &opts);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, db })
}

fn bearer(id: Uuid, role: Role) -> String {
    let claims = Claims { sub: id, role, email: String::new(), name: String::new(), exp: (chrono::Utc::now().timestamp() + 600) as usize };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("sign token");
    format!("Bearer {token}")
}

fn haircut_form() -> Form {
    let image = Part::bytes(vec![0xff, 0xd8, 0xff]).file_name("cut.jpg").mime_str("image/jpeg").expect("mime");
    Form::new()
        .text("name", "Haircut")
        .text("description", "Basic cut")
        .text("price", "20")
        .text("category", "Grooming")
        .part("image", image)
}

#[tokio::test]
async fn e2e_service_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let client = reqwest::Client::new();

    let owner = models::user::create(&app.db, "Pat", &format!("pat_{}@example.com", Uuid::new_v4()), "provider").await?;

    let res = client
        .post(format!("{}/api/services", app.base_url))
        .header("Authorization", bearer(owner.id, Role::Provider))
        .multipart(haircut_form())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["provider"], owner.id.to_string());
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let res = client.get(format!("{}/api/services/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found: Value = res.json().await?;
    assert_eq!(found["provider"]["name"], "Pat");

    let res = client
        .get(format!("{}/api/services/provider", app.base_url))
        .header("Authorization", bearer(owner.id, Role::Provider))
        .send()
        .await?;
    let mine: Vec<Value> = res.json().await?;
    assert_eq!(mine.len(), 1);

    let res = client
        .delete(format!("{}/api/services/{}", app.base_url, id))
        .header("Authorization", bearer(Uuid::new_v4(), Role::Customer))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/services/{}", app.base_url, id))
        .header("Authorization", bearer(owner.id, Role::Provider))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client.get(format!("{}/api/services/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    use sea_orm::EntityTrait;
    models::user::Entity::delete_by_id(owner.id).exec(&app.db).await?;
    Ok(())
}
