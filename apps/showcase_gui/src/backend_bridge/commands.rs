//! Commands queued from the UI thread to the backend worker.

pub enum BackendCommand {
    SignIn { email: String, password: String },
    SignOut,
    FetchDocuments,
    SignDocuments { paths: Vec<String> },
}
