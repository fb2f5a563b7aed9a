use wf_core::FeedStore;

pub struct AppState {
    pub store: FeedStore,
}
