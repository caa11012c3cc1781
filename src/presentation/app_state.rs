// Application state for HTTP handlers
use crate::application::chat_service::ChatService;
use crate::application::curation_service::CurationService;
use crate::application::fleet_service::FleetService;
use crate::application::streaming_service::LiveFeedService;

#[derive(Clone)]
pub struct AppState {
    pub curation_service: CurationService,
    pub fleet_service: FleetService,
    pub chat_service: ChatService,
    pub live_feed: LiveFeedService,
}
