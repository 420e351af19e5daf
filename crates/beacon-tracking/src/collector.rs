//! Telemetry collection — visitor environment plus behavior counters.

use std::time::{Duration, Instant};

use beacon_core::record::{encode_list, DIRECT_REFERRER};
use beacon_core::{SessionId, TelemetryRecord};
use serde::{Deserialize, Serialize};

/// Click targets kept for `clicksData`; older entries are dropped first.
pub const MAX_CLICK_LOG: usize = 50;

/// Static facts about the visitor's runtime, supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorEnvironment {
    pub user_agent: String,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// `None` for direct navigation.
    pub referrer: Option<String>,
    pub platform: String,
    pub timezone: String,
    pub device_memory: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub max_touch_points: Option<u32>,
    pub pixel_ratio: Option<f64>,
    pub webdriver: bool,
    pub location: Option<VisitorLocation>,
}

/// Resolved location, from device geolocation or an IP lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
    pub address: String,
    pub ip: String,
}

/// Running counters of on-page behavior.
#[derive(Debug, Clone)]
pub struct BehaviorTracker {
    started_at: Instant,
    clicks: u32,
    click_log: Vec<String>,
    scrolls: u32,
    scroll_max_depth: u32,
    sections_viewed: Vec<String>,
    mouse_movements: u32,
    keystrokes: u32,
    links_clicked: Vec<String>,
    forms_interacted: u32,
    hovered: Vec<String>,
    focus_time: Duration,
}

impl Default for BehaviorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorTracker {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started_at: Instant) -> Self {
        Self {
            started_at,
            clicks: 0,
            click_log: Vec::new(),
            scrolls: 0,
            scroll_max_depth: 0,
            sections_viewed: Vec::new(),
            mouse_movements: 0,
            keystrokes: 0,
            links_clicked: Vec::new(),
            forms_interacted: 0,
            hovered: Vec::new(),
            focus_time: Duration::ZERO,
        }
    }

    pub fn record_click(&mut self, target: &str) {
        self.clicks += 1;
        if self.click_log.len() == MAX_CLICK_LOG {
            self.click_log.remove(0);
        }
        self.click_log.push(target.to_string());
    }

    /// Record a scroll event at `depth_percent` of the page.
    pub fn record_scroll(&mut self, depth_percent: f64) {
        self.scrolls += 1;
        let depth = depth_percent.clamp(0.0, 100.0).round() as u32;
        self.scroll_max_depth = self.scroll_max_depth.max(depth);
    }

    pub fn view_section(&mut self, section: &str) {
        push_unique(&mut self.sections_viewed, section);
    }

    pub fn record_mouse_move(&mut self) {
        self.mouse_movements += 1;
    }

    pub fn record_keystroke(&mut self) {
        self.keystrokes += 1;
    }

    pub fn click_link(&mut self, href: &str) {
        push_unique(&mut self.links_clicked, href);
    }

    pub fn interact_form(&mut self) {
        self.forms_interacted += 1;
    }

    pub fn hover(&mut self, element: &str) {
        push_unique(&mut self.hovered, element);
    }

    pub fn add_focus_time(&mut self, duration: Duration) {
        self.focus_time += duration;
    }

    pub fn time_on_page(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn apply(&self, record: &mut TelemetryRecord) {
        record.clicks_count = self.clicks;
        record.clicks_data = encode_list(&self.click_log);
        record.scrolls_count = self.scrolls;
        record.scroll_max_depth = self.scroll_max_depth;
        record.time_on_page_seconds = self.time_on_page().as_secs();
        record.sections_viewed_count = self.sections_viewed.len() as u32;
        record.sections_viewed = encode_list(&self.sections_viewed);
        record.mouse_movements_count = self.mouse_movements;
        record.keystroke_count = self.keystrokes;
        record.links_clicked_count = self.links_clicked.len() as u32;
        record.links_clicked = encode_list(&self.links_clicked);
        record.forms_interacted_count = self.forms_interacted;
        record.hovered_elements_count = self.hovered.len() as u32;
        record.hovered_elements = encode_list(&self.hovered);
        record.page_focus_time = self.focus_time.as_secs();
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Builds telemetry records for one visitor.
pub struct Collector {
    session_id: SessionId,
    environment: VisitorEnvironment,
    behavior: BehaviorTracker,
}

impl Collector {
    pub fn new(session_id: SessionId, environment: VisitorEnvironment) -> Self {
        Self {
            session_id,
            environment,
            behavior: BehaviorTracker::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn behavior(&self) -> &BehaviorTracker {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut BehaviorTracker {
        &mut self.behavior
    }

    /// Produce a record for `action` from the current environment and counters.
    pub fn snapshot(&self, action: &str) -> TelemetryRecord {
        let env = &self.environment;
        let mut record = TelemetryRecord::new(action);

        record.user_agent = env.user_agent.clone();
        record.language = env.language.clone();
        record.screen_resolution = format!("{}x{}", env.screen_width, env.screen_height);
        record.referrer = env
            .referrer
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DIRECT_REFERRER.to_string());
        record.platform = env.platform.clone();
        record.timezone = env.timezone.clone();
        record.device_memory = env.device_memory;
        record.hardware_concurrency = env.hardware_concurrency;
        record.max_touch_points = env.max_touch_points;
        record.pixel_ratio = env.pixel_ratio;
        record.webdriver = env.webdriver;

        if let Some(loc) = &env.location {
            record.latitude = loc.latitude;
            record.longitude = loc.longitude;
            record.city = loc.city.clone();
            record.region = loc.region.clone();
            record.country = loc.country.clone();
            record.postal_code = loc.postal_code.clone();
            record.address = loc.address.clone();
            record.ip = loc.ip.clone();
        }

        self.behavior.apply(&mut record);
        record.session_id = self.session_id.to_string();
        record
    }
}
