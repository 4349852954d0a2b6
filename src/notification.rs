/// Content of the level-result modal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_coins: Option<u64>,
    pub success: bool,
}

impl NotificationInfo {
    pub fn wrong_answer() -> Self {
        Self {
            title: "Wrong answer".to_string(),
            subtitle: Some("Keep your progress".to_string()),
            reward_coins: None,
            success: false,
        }
    }

    pub fn level_reached(level: u32, reward: u64) -> Self {
        Self {
            title: format!("Level {level}"),
            subtitle: (reward > 0).then(|| format!("You earned {reward} coins")),
            reward_coins: Some(reward),
            success: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    pub visible: bool,
    pub info: Option<NotificationInfo>,
    /// Level emphasised while the level counter has not committed yet.
    pub highlighted_level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationStore {
    state: NotificationState,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn show(&mut self, info: NotificationInfo, highlighted_level: Option<u32>) {
        self.state = NotificationState {
            visible: true,
            info: Some(info),
            highlighted_level,
        };
    }

    pub fn hide(&mut self) {
        self.state = NotificationState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_populates_and_overwrites() {
        let mut store = NotificationStore::new();
        store.show(NotificationInfo::wrong_answer(), None);
        store.show(NotificationInfo::level_reached(3, 10), Some(3));

        let state = store.state();
        assert!(state.visible);
        assert_eq!(state.highlighted_level, Some(3));
        assert_eq!(
            state.info.as_ref().map(|info| info.title.as_str()),
            Some("Level 3")
        );
    }

    #[test]
    fn hide_twice_matches_hide_once() {
        let mut store = NotificationStore::new();
        store.show(NotificationInfo::level_reached(1, 0), Some(1));

        store.hide();
        let once = store.clone();
        store.hide();

        assert_eq!(store, once);
        assert_eq!(store.state(), &NotificationState::default());
    }

    #[test]
    fn subtitle_only_for_nonzero_reward() {
        assert_eq!(NotificationInfo::level_reached(2, 0).subtitle, None);
        assert_eq!(
            NotificationInfo::level_reached(4, 10).subtitle.as_deref(),
            Some("You earned 10 coins")
        );
    }

    #[test]
    fn serializes_without_absent_fields() {
        let json = serde_json::to_value(NotificationInfo::level_reached(2, 0))
            .expect("notification should serialize");

        assert_eq!(
            json,
            serde_json::json!({ "title": "Level 2", "rewardCoins": 0, "success": true })
        );
    }
}
