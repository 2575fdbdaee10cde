use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Migrations run once per test process; `None` records that the database is unreachable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file().unwrap_or_else(DatabaseConfig::from_env);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    cfg
}

/// A migrated connection, or `None` when DB tests are skipped or no database answers.
pub async fn db_or_skip() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let db = match connect_with_config(&config()).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skip: migrate up failed: {}", e);
                return false;
            }
            true
        })
        .await;
    if !migrated {
        return None;
    }
    // Fresh connection for the current test's runtime
    connect_with_config(&config()).await.ok()
}

mod seaorm_repository {
    use super::db_or_skip;
    use crate::catalog::repo::SeaOrmServiceRepository;
    use crate::catalog::repository::ServiceRepository;
    use models::service::ServiceDraft;
    use sea_orm::EntityTrait;
    use uuid::Uuid;

    fn draft(provider_id: Uuid, name: &str) -> ServiceDraft {
        ServiceDraft {
            name: name.into(),
            description: "Basic cut".into(),
            price: 20.0,
            category: "Grooming".into(),
            image: "https://res.cloudinary.com/demo/image/upload/services/cut.jpg".into(),
            provider_id,
        }
    }

    #[tokio::test]
    async fn populated_reads_and_provider_filter() -> anyhow::Result<()> {
        let Some(db) = db_or_skip().await else { return Ok(()) };
        let repo = SeaOrmServiceRepository::new(db.clone());

        let email = format!("pat_{}@example.com", Uuid::new_v4());
        let owner = models::user::create(&db, "Pat", &email, "provider").await?;
        let a = repo.insert(draft(owner.id, "Haircut")).await?;
        let b = repo.insert(draft(owner.id, "Beard trim")).await?;
        let other = repo.insert(draft(Uuid::new_v4(), "Shave")).await?;

        let mine = repo.list_by_provider(owner.id).await?;
        assert_eq!(mine.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a.id, b.id]);

        let found = repo.find_by_id_populated(a.id).await?.expect("row");
        assert_eq!(found.provider.map(|p| p.email), Some(email));
        let orphan = repo.find_by_id_populated(other.id).await?.expect("row");
        assert!(orphan.provider.is_none());

        let all = repo.list_populated().await?;
        let pos = |id| all.iter().position(|s| s.id == id);
        assert!(pos(a.id) < pos(b.id));

        for id in [a.id, b.id, other.id] {
            assert!(repo.delete_by_id(id).await?);
        }
        assert!(!repo.delete_by_id(a.id).await?);
        models::user::Entity::delete_by_id(owner.id).exec(&db).await?;
        Ok(())
    }
}
