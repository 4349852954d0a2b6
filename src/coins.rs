use tracing::{debug, warn};

use crate::quiz::{Quiz, QuizEvent};
use crate::storage::KeyValueStore;

/// Key holding the balance as a base-10 integer string.
pub const COINS_KEY: &str = "coins";

/// Best-effort persistence of the coin balance.
///
/// Failures are logged and swallowed; the in-memory balance always wins.
#[derive(Debug)]
pub struct CoinGateway<S> {
    store: S,
}

impl<S: KeyValueStore> CoinGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the stored balance. Absent, unreadable and unparsable values all
    /// come back as `None`.
    pub async fn load_coins(&self) -> Option<u64> {
        let stored = match self.store.get(COINS_KEY).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                debug!("no stored coin balance");
                return None;
            }
            Err(error) => {
                warn!(%error, "failed to load coins");
                return None;
            }
        };

        match stored.trim().parse::<u64>() {
            Ok(coins) => Some(coins),
            Err(error) => {
                warn!(value = %stored, %error, "ignoring unparsable coin balance");
                None
            }
        }
    }

    /// Overwrites the quiz balance with the stored one when there is one.
    pub async fn restore_into(&self, quiz: &mut Quiz) {
        if let Some(coins) = self.load_coins().await {
            debug!(coins, "restored coin balance");
            quiz.restore_coins(coins);
        }
    }

    pub async fn save_coins(&self, coins: u64) {
        if let Err(error) = self.store.set(COINS_KEY, &coins.to_string()).await {
            warn!(coins, %error, "failed to save coins");
        }
    }

    /// Saves the latest balance found in a batch of drained events.
    pub async fn persist(&self, events: &[QuizEvent]) {
        let latest = events.iter().rev().find_map(|event| match event {
            QuizEvent::CoinsChanged { balance } => Some(*balance),
            _ => None,
        });

        if let Some(coins) = latest {
            self.save_coins(coins).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::{QuizConfig, builtin_catalog};

    #[tokio::test]
    async fn empty_store_keeps_current_balance() {
        let gateway = CoinGateway::new(MemoryStore::new());
        let mut quiz = Quiz::new(builtin_catalog(), QuizConfig::default());

        gateway.restore_into(&mut quiz).await;

        assert_eq!(quiz.progression().coins, 0);
    }

    #[tokio::test]
    async fn stored_balance_overwrites() {
        let gateway = CoinGateway::new(MemoryStore::with_entry(COINS_KEY, "70"));
        let mut quiz = Quiz::new(builtin_catalog(), QuizConfig::default());

        gateway.restore_into(&mut quiz).await;

        assert_eq!(quiz.progression().coins, 70);
    }

    #[tokio::test]
    async fn garbage_value_is_ignored() {
        let gateway = CoinGateway::new(MemoryStore::with_entry(COINS_KEY, "lots"));
        let mut quiz = Quiz::new(builtin_catalog(), QuizConfig::default());
        quiz.restore_coins(5);

        gateway.restore_into(&mut quiz).await;

        assert_eq!(quiz.progression().coins, 5);
    }

    #[tokio::test]
    async fn unavailable_store_degrades_silently() {
        let gateway = CoinGateway::new(MemoryStore::unavailable());

        assert_eq!(gateway.load_coins().await, None);
        gateway.save_coins(10).await;
    }

    #[tokio::test]
    async fn persist_writes_latest_balance() {
        let gateway = CoinGateway::new(MemoryStore::new());

        gateway
            .persist(&[
                QuizEvent::CoinsChanged { balance: 10 },
                QuizEvent::ModalHidden,
                QuizEvent::CoinsChanged { balance: 30 },
                QuizEvent::QuestionAdvanced { index: 4 },
            ])
            .await;

        assert_eq!(gateway.store().peek(COINS_KEY).as_deref(), Some("30"));
    }

    #[tokio::test]
    async fn persist_skips_batches_without_coin_changes() {
        let gateway = CoinGateway::new(MemoryStore::new());

        gateway.persist(&[QuizEvent::ModalHidden]).await;

        assert_eq!(gateway.store().peek(COINS_KEY), None);
    }
}
