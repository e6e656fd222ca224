//! Unique-identifier allocation with bounded collision retry.
//!
//! Every entity table keys rows by a random [`ShortId`]. Generation alone
//! cannot guarantee uniqueness, so creation runs through
//! [`insert_with_unique_id`]: attempt the insert, and if the store rejects
//! it with a primary-key collision, generate a fresh identifier and try
//! again, up to [`MAX_ATTEMPTS`] times. The database's uniqueness constraint
//! is the serialization point for concurrent collisions; this loop is local
//! and synchronous.
//!
//! The loop reacts to [`RepositoryError::IdCollision`] only. Any other
//! failure - notably a [`RepositoryError::Conflict`] on some other unique
//! column such as an email address - is returned immediately, without
//! regenerating the identifier.

use std::future::Future;

use bazaar_core::ShortId;

use super::RepositoryError;

/// Maximum insert attempts before giving up on allocation.
pub const MAX_ATTEMPTS: u32 = 5;

/// Persist an entity under a unique short identifier.
///
/// `preset` is respected when given: the first attempt uses it, and it is
/// only replaced if that attempt collides. With no preset a fresh identifier
/// is generated for the first attempt.
///
/// `insert` performs one write attempt under the given identifier. Only the
/// final successful attempt's effects are durable; rejected attempts insert
/// nothing.
///
/// # Errors
///
/// - [`RepositoryError::IdSpaceExhausted`] after [`MAX_ATTEMPTS`] collisions;
///   fatal to the triggering write and worth alerting on.
/// - Any non-collision error from `insert`, unchanged, on the attempt that
///   produced it.
pub async fn insert_with_unique_id<T, F, Fut>(
    preset: Option<ShortId>,
    mut insert: F,
) -> Result<T, RepositoryError>
where
    F: FnMut(ShortId) -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    let mut id = preset.unwrap_or_else(ShortId::generate);

    for attempt in 1..=MAX_ATTEMPTS {
        match insert(id.clone()).await {
            Err(RepositoryError::IdCollision) => {
                tracing::warn!(attempt, id = %id, "identifier collision, regenerating");
                id = ShortId::generate();
            }
            other => return other,
        }
    }

    tracing::error!(
        attempts = MAX_ATTEMPTS,
        "identifier allocation exhausted, giving up"
    );
    Err(RepositoryError::IdSpaceExhausted {
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Fake persistence store: scripted to collide on the first `collisions`
    /// attempts, recording every identifier it rejects or accepts.
    struct FakeStore {
        collisions: u32,
        rejected: Mutex<Vec<String>>,
        saved: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn colliding(collisions: u32) -> Self {
            Self {
                collisions,
                rejected: Mutex::new(Vec::new()),
                saved: Mutex::new(Vec::new()),
            }
        }

        async fn try_insert(&self, id: ShortId) -> Result<ShortId, RepositoryError> {
            let attempts_so_far =
                self.rejected.lock().unwrap().len() + self.saved.lock().unwrap().len();
            if (attempts_so_far as u32) < self.collisions {
                self.rejected.lock().unwrap().push(id.as_str().to_owned());
                return Err(RepositoryError::IdCollision);
            }
            self.saved.lock().unwrap().push(id.as_str().to_owned());
            Ok(id)
        }
    }

    #[tokio::test]
    async fn test_preset_id_is_respected() {
        let store = FakeStore::colliding(0);
        let preset = ShortId::parse("abcdefghjkmn").unwrap();

        let id = insert_with_unique_id(Some(preset.clone()), |id| store.try_insert(id))
            .await
            .unwrap();

        assert_eq!(id, preset);
        assert_eq!(store.saved.lock().unwrap().as_slice(), ["abcdefghjkmn"]);
    }

    #[tokio::test]
    async fn test_collision_retries_with_fresh_id() {
        let store = FakeStore::colliding(3);

        let id = insert_with_unique_id(None, |id| store.try_insert(id))
            .await
            .unwrap();

        let rejected = store.rejected.lock().unwrap();
        assert_eq!(rejected.len(), 3);
        assert!(
            !rejected.contains(&id.as_str().to_owned()),
            "final identifier must differ from every rejected one"
        );
        // Saved exactly once.
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_preset_id_regenerated_on_collision() {
        let store = FakeStore::colliding(1);
        let preset = ShortId::parse("abcdefghjkmn").unwrap();

        let id = insert_with_unique_id(Some(preset.clone()), |id| store.try_insert(id))
            .await
            .unwrap();

        assert_eq!(store.rejected.lock().unwrap().as_slice(), ["abcdefghjkmn"]);
        assert_ne!(id, preset);
    }

    #[tokio::test]
    async fn test_exhaustion_after_max_attempts() {
        let store = FakeStore::colliding(u32::MAX);

        let err = insert_with_unique_id(None, |id| store.try_insert(id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::IdSpaceExhausted {
                attempts: MAX_ATTEMPTS
            }
        ));
        assert_eq!(store.rejected.lock().unwrap().len(), MAX_ATTEMPTS as usize);
        // Nothing persisted.
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_collision_error_passes_through() {
        let attempts = Mutex::new(Vec::<String>::new());

        let err = insert_with_unique_id(None, |id| {
            attempts.lock().unwrap().push(id.as_str().to_owned());
            async { Err::<(), _>(RepositoryError::Conflict("email already exists".to_owned())) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(msg) if msg == "email already exists"));
        // Failed on the first attempt; the identifier was never regenerated.
        assert_eq!(attempts.lock().unwrap().len(), 1);
    }
}
