use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Certificate;
use crate::store::Store;

pub async fn by_user(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Certificate>> {
    Ok(store.list_certificates_by_user(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn cert(user_id: Uuid, title: &str) -> Certificate {
        Certificate {
            id: Uuid::new_v4(),
            user_id,
            course_id: Uuid::new_v4(),
            title: Some(title.into()),
            issued_at: None,
            url: Some(format!("https://certs.local/{title}")),
        }
    }

    #[tokio::test]
    async fn returns_only_the_users_certificates() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mine = cert(user, "rust");
        store.add_certificate(mine.clone()).await;
        store.add_certificate(cert(Uuid::new_v4(), "other")).await;

        assert_eq!(by_user(&store, user).await.unwrap(), vec![mine]);
        assert!(by_user(&store, Uuid::new_v4()).await.unwrap().is_empty());
    }
}
