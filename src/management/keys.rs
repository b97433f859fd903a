//! Cache key schema: `{namespace}:{entity}:{id}`.

pub fn user_by_token(token: &str) -> String {
    format!("token-cache:user-by-token:{}", token)
}

pub fn user_by_id(user_id: &str) -> String {
    format!("user-cache:user:{}", user_id)
}

pub fn library(user_id: &str) -> String {
    format!("library-cache:user:{}", user_id)
}

pub fn share_owner(share_id: &str) -> String {
    format!("share-index:owner:{}", share_id)
}

pub fn share_tracks(share_id: &str) -> String {
    format!("share-index:tracks:{}", share_id)
}

pub fn likes(user_id: &str) -> String {
    format!("likes:user:{}", user_id)
}
