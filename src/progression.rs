/// Snapshot of the player's position in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub current_level: u32,
    /// Grows by one per dismissed notification; a value past the catalog
    /// length means the quiz is complete.
    pub current_question_index: usize,
    /// The single level that stays coloured when no level is highlighted.
    pub last_colored_level: u32,
    pub coins: u64,
}

impl ProgressionState {
    pub const INITIAL_LEVEL: u32 = 0;
    pub const INITIAL_COLORED_LEVEL: u32 = 1;

    pub fn with_coins(coins: u64) -> Self {
        Self {
            current_level: Self::INITIAL_LEVEL,
            current_question_index: 0,
            last_colored_level: Self::INITIAL_COLORED_LEVEL,
            coins,
        }
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::with_coins(0)
    }
}

/// Owns the progression state and exposes its transitions.
///
/// The store trusts its caller: level changes are not checked for
/// monotonicity and the question index is never bounds-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionStore {
    state: ProgressionState,
}

impl ProgressionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coins(coins: u64) -> Self {
        Self {
            state: ProgressionState::with_coins(coins),
        }
    }

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn advance_question(&mut self) {
        self.state.current_question_index += 1;
    }

    pub fn set_level(&mut self, level: u32) {
        self.state.current_level = level;
        self.state.last_colored_level = level;
    }

    /// Adds `amount` to the balance, clamping at zero for negative amounts.
    pub fn increment_coins(&mut self, amount: i64) {
        if amount >= 0 {
            self.state.coins = self.state.coins.saturating_add(amount.unsigned_abs());
        } else {
            self.decrement_coins(amount.unsigned_abs());
        }
    }

    pub fn decrement_coins(&mut self, amount: u64) {
        self.state.coins = self.state.coins.saturating_sub(amount);
    }

    pub fn set_coins(&mut self, coins: u64) {
        self.state.coins = coins;
    }

    pub fn reset_coins(&mut self) {
        self.state.coins = 0;
    }

    /// Restores level, question index and coloured level. Coins survive.
    pub fn reset(&mut self) {
        self.state = ProgressionState::with_coins(self.state.coins);
    }
}
