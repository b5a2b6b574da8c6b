use serde_json::{json, Map, Value};

use crate::dispatcher::{HandlerRequest, HandlerResponse, HandlerResult};
use crate::resource::Resource;

/// Handler that reflects the request back as JSON.
pub fn echo_handler(req: &HandlerRequest) -> HandlerResult {
    let path_params: Map<String, Value> = req
        .path_params
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
        .collect();

    Ok(HandlerResponse::ok(json!({
        "request_id": req.request_id.to_string(),
        "method": req.method.as_str(),
        "path": req.path,
        "route": req.route_pattern,
        "path_params": path_params,
        "params": req.params,
    })))
}

/// Resource answering GET, POST, PUT and DELETE with [`echo_handler`].
#[must_use]
pub fn echo_resource() -> Resource {
    Resource::new()
        .get(echo_handler)
        .post(echo_handler)
        .put(echo_handler)
        .delete(echo_handler)
}
