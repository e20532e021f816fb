//! UseCase: 本日の設定の読み込み
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LoadSettingsUseCase::execute() のキャッシュ読み込みとフォールバック
//!
//! ### どのような状況を想定しているか
//! - キャッシュヒット（リモート呼び出しなし）
//! - キャッシュミス → 取得してキャッシュ
//! - 取得失敗 → 既定値（キャッシュしない）

use std::sync::Arc;

use tracing::{debug, error};

use crate::{
    domain::{QueueGateway, Settings},
    infrastructure::SettingsCache,
    ui::{ClientView, Notice},
};

/// Cache key of the meeting settings
pub const SETTINGS_CACHE_KEY: &str = "settings";

/// Warning shown when the defaults are used
pub const SETTINGS_FALLBACK_MESSAGE: &str = "系統設定載入失敗，使用預設燈種";

/// 設定読み込みのユースケース
pub struct LoadSettingsUseCase {
    gateway: Arc<dyn QueueGateway>,
    cache: Arc<SettingsCache>,
    view: Arc<dyn ClientView>,
}

impl LoadSettingsUseCase {
    pub fn new(
        gateway: Arc<dyn QueueGateway>,
        cache: Arc<SettingsCache>,
        view: Arc<dyn ClientView>,
    ) -> Self {
        Self {
            gateway,
            cache,
            view,
        }
    }

    /// Settings for today. Never fails: the defaults stand in for an
    /// unreachable endpoint.
    pub async fn execute(&self) -> Settings {
        if let Some(settings) = self.cache.get::<Settings>(SETTINGS_CACHE_KEY) {
            debug!("Settings served from cache");
            self.view.show_light_type(&settings.light_type);
            return settings;
        }

        match self.gateway.get_meeting_settings().await {
            Ok(settings) => {
                self.cache.set(SETTINGS_CACHE_KEY, &settings);
                self.view.show_light_type(&settings.light_type);
                settings
            }
            Err(e) => {
                error!("Failed to load settings: {}", e);
                let settings = Settings::default();
                self.view.show_light_type(&settings.light_type);
                self.view.alert(Notice::warning(SETTINGS_FALLBACK_MESSAGE));
                settings
            }
        }
    }
}
