#![deny(missing_docs)]

//! # Method Augmentation
//!
//! Merges endpoint documentation into an existing `AWS::ApiGateway::Method`
//! resource: request models, method responses (keyed by status code) and
//! request parameters. Data already present on the method is kept; direct
//! model references become dependencies of the method, imported ones are
//! written as their external identifier.

use crate::documentation::{EndpointDocumentation, ModelMap, Param};
use crate::template::Resource;
use derive_more::Display;
use indexmap::IndexSet;
use serde_json::{json, Map, Value};

/// Where a documented request parameter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParamLocation {
    /// Request header.
    #[display("header")]
    Header,
    /// Query string parameter.
    #[display("querystring")]
    QueryString,
    /// Path parameter.
    #[display("path")]
    Path,
}

/// Writes the request models of `documentation` onto the method.
///
/// No-op when the endpoint declares no request models.
pub fn add_request_models(resource: &mut Resource, documentation: &EndpointDocumentation) {
    if documentation.request_models.is_empty() {
        return;
    }

    let Resource {
        properties,
        depends_on,
        ..
    } = resource;
    let Some(request_models) = object_property(properties, "RequestModels") else {
        return;
    };
    attach_models(request_models, depends_on, &documentation.request_models);
}

/// Merges the documented responses into the method's `MethodResponses`.
///
/// Responses are matched by status code; a code already present on the
/// method is merged into rather than duplicated.
pub fn add_method_responses(resource: &mut Resource, documentation: &EndpointDocumentation) {
    if documentation.method_responses.is_empty() {
        return;
    }

    let Resource {
        properties,
        depends_on,
        ..
    } = resource;
    let Some(responses) = array_property(properties, "MethodResponses") else {
        return;
    };

    for response in &documentation.method_responses {
        let code = response.status_code.as_str();
        let idx = match responses
            .iter()
            .position(|existing| status_code_of(existing).as_deref() == Some(code))
        {
            Some(idx) => idx,
            None => {
                responses.push(json!({ "StatusCode": response.status_code }));
                responses.len() - 1
            }
        };
        let Value::Object(entry) = &mut responses[idx] else {
            continue;
        };

        if let Some(headers) = &response.response_headers {
            if let Some(parameters) = object_property(entry, "ResponseParameters") {
                for header in headers {
                    parameters
                        .entry(format!("method.response.header.{}", header.name))
                        .or_insert(Value::Bool(true));
                }
            }
        }

        if let Some(models) = &response.response_models {
            if let Some(response_models) = object_property(entry, "ResponseModels") {
                attach_models(response_models, depends_on, models);
            }
        }
    }
}

/// Declares documented parameters in the method's `RequestParameters`.
///
/// Each parameter maps to whether it is required. Keys already configured on
/// the method are left as they are.
pub fn add_request_parameters(resource: &mut Resource, params: &[Param], location: ParamLocation) {
    if params.is_empty() {
        return;
    }

    let Some(request_params) = object_property(&mut resource.properties, "RequestParameters")
    else {
        return;
    };
    for param in params {
        request_params
            .entry(format!("method.request.{location}.{}", param.name))
            .or_insert(Value::Bool(param.required.unwrap_or(false)));
    }
}

/// Applies all documentation of an endpoint to its method resource.
///
/// In safe mode request parameters are not touched.
pub fn augment_method(
    resource: &mut Resource,
    documentation: &EndpointDocumentation,
    safe_mode: bool,
) {
    add_method_responses(resource, documentation);
    add_request_models(resource, documentation);

    if !safe_mode {
        add_request_parameters(resource, &documentation.request_headers, ParamLocation::Header);
        add_request_parameters(resource, &documentation.query_params, ParamLocation::QueryString);
        add_request_parameters(resource, &documentation.path_params, ParamLocation::Path);
    }
}

fn attach_models(
    target: &mut Map<String, Value>,
    depends_on: &mut IndexSet<String>,
    models: &ModelMap,
) {
    for (content_type, model) in models {
        if let Some(dependency) = model.dependency() {
            depends_on.insert(dependency);
        }
        target.insert(content_type.clone(), Value::String(model.target().to_owned()));
    }
}

fn status_code_of(response: &Value) -> Option<String> {
    match response.get("StatusCode")? {
        Value::String(code) => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Whether `map` is a single intrinsic function call such as `{ "Ref": .. }`.
fn is_intrinsic(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.keys().all(|k| k == "Ref" || k.starts_with("Fn::"))
}

/// The object under `key`, created when absent.
///
/// Any other value (an `Fn::If`, a `Ref`) is left as it is and `None` returned.
fn object_property<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    match map.entry(key).or_insert_with(|| Value::Object(Map::new())) {
        Value::Object(inner) if !is_intrinsic(inner) => Some(inner),
        _ => {
            tracing::warn!(property = key, "property is not a plain object, not augmented");
            None
        }
    }
}

/// The array under `key`, created when absent. Same rules as [`object_property`].
fn array_property<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Vec<Value>> {
    match map.entry(key).or_insert_with(|| Value::Array(Vec::new())) {
        Value::Array(items) => Some(items),
        _ => {
            tracing::warn!(property = key, "property is not a plain array, not augmented");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documentation::ModelRef;
    use crate::template::METHOD_RESOURCE_TYPE;
    use pretty_assertions::assert_eq;

    fn method(properties: Value) -> Resource {
        let mut resource = Resource::new(METHOD_RESOURCE_TYPE);
        if let Value::Object(map) = properties {
            resource.properties = map;
        }
        resource
    }

    fn docs(value: Value) -> EndpointDocumentation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_models_add_dependencies() {
        let mut resource = method(json!({ "HttpMethod": "POST" }));
        let doc = docs(json!({ "requestModels": { "application/json": "CreatePet" } }));

        add_request_models(&mut resource, &doc);

        assert_eq!(
            resource.properties["RequestModels"],
            json!({ "application/json": "CreatePet" })
        );
        assert_eq!(resource.depends_on.iter().collect::<Vec<_>>(), vec!["CreatePetModel"]);
    }

    #[test]
    fn test_request_models_import_bypasses_dependency() {
        let mut resource = method(json!({}));
        let mut doc = EndpointDocumentation::default();
        doc.request_models
            .insert("application/json".into(), ModelRef::imported("ext-42"));
        doc.request_models
            .insert("application/xml".into(), ModelRef::Direct("PetXml".into()));

        add_request_models(&mut resource, &doc);

        assert_eq!(
            resource.properties["RequestModels"],
            json!({ "application/json": "ext-42", "application/xml": "PetXml" })
        );
        assert_eq!(resource.depends_on.iter().collect::<Vec<_>>(), vec!["PetXmlModel"]);
    }

    #[test]
    fn test_request_models_empty_is_noop() {
        let mut resource = method(json!({ "HttpMethod": "GET" }));
        let before = resource.clone();
        add_request_models(&mut resource, &EndpointDocumentation::default());
        assert_eq!(resource, before);
    }

    #[test]
    fn test_method_responses_created_when_absent() {
        let mut resource = method(json!({}));
        let doc = docs(json!({
            "methodResponses": [{
                "statusCode": 200,
                "responseHeaders": [{ "name": "X-Rate-Limit" }],
                "responseModels": { "application/json": "Pet" }
            }]
        }));

        add_method_responses(&mut resource, &doc);

        assert_eq!(
            resource.properties["MethodResponses"],
            json!([{
                "StatusCode": "200",
                "ResponseParameters": { "method.response.header.X-Rate-Limit": true },
                "ResponseModels": { "application/json": "Pet" }
            }])
        );
        assert!(resource.depends_on.contains("PetModel"));
    }

    #[test]
    fn test_method_responses_merge_on_status_code() {
        let mut resource = method(json!({
            "MethodResponses": [{
                "StatusCode": 200,
                "ResponseParameters": { "method.response.header.ETag": false }
            }]
        }));
        let doc = docs(json!({
            "methodResponses": [{
                "statusCode": "200",
                "responseHeaders": [{ "name": "ETag" }, { "name": "X-Trace" }],
                "responseModels": { "application/json": "Pet" }
            }]
        }));

        add_method_responses(&mut resource, &doc);

        let responses = resource.properties["MethodResponses"].as_array().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(
            responses[0],
            json!({
                "StatusCode": 200,
                "ResponseParameters": {
                    "method.response.header.ETag": false,
                    "method.response.header.X-Trace": true
                },
                "ResponseModels": { "application/json": "Pet" }
            })
        );
    }

    #[test]
    fn test_method_responses_append_new_codes_in_order() {
        let mut resource = method(json!({ "MethodResponses": [{ "StatusCode": "200" }] }));
        let doc = docs(json!({
            "methodResponses": [
                { "statusCode": "404" },
                { "statusCode": "200" },
                { "statusCode": "500", "responseModels": { "application/json": { "import": "err-1" } } }
            ]
        }));

        add_method_responses(&mut resource, &doc);

        let codes: Vec<_> = resource.properties["MethodResponses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["StatusCode"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(codes, vec!["200", "404", "500"]);
        assert_eq!(
            resource.properties["MethodResponses"][2]["ResponseModels"],
            json!({ "application/json": "err-1" })
        );
        assert!(resource.depends_on.is_empty());
    }

    #[test]
    fn test_method_responses_empty_is_noop() {
        let mut resource = method(json!({}));
        add_method_responses(&mut resource, &EndpointDocumentation::default());
        assert!(!resource.properties.contains_key("MethodResponses"));
    }

    #[test]
    fn test_intrinsic_method_responses_are_preserved() {
        let conditional = json!({
            "Fn::If": ["IsProd", [{ "StatusCode": "200" }], { "Ref": "AWS::NoValue" }]
        });
        let mut resource = method(json!({ "MethodResponses": conditional.clone() }));
        let doc = docs(json!({
            "methodResponses": [{
                "statusCode": 200,
                "responseModels": { "application/json": "Pet" }
            }]
        }));

        add_method_responses(&mut resource, &doc);

        assert_eq!(resource.properties["MethodResponses"], conditional);
        assert!(resource.depends_on.is_empty());
    }

    #[test]
    fn test_intrinsic_response_parameters_are_preserved() {
        let conditional = json!({ "Fn::If": ["IsProd", {}, {}] });
        let mut resource = method(json!({
            "MethodResponses": [{ "StatusCode": "200", "ResponseParameters": conditional.clone() }]
        }));
        let doc = docs(json!({
            "methodResponses": [{
                "statusCode": "200",
                "responseHeaders": [{ "name": "ETag" }],
                "responseModels": { "application/json": "Pet" }
            }]
        }));

        add_method_responses(&mut resource, &doc);

        let response = &resource.properties["MethodResponses"][0];
        assert_eq!(response["ResponseParameters"], conditional);
        assert_eq!(response["ResponseModels"], json!({ "application/json": "Pet" }));
        assert!(resource.depends_on.contains("PetModel"));
    }

    #[test]
    fn test_intrinsic_request_properties_are_preserved() {
        let params_ref = json!({ "Ref": "SharedParams" });
        let models_if = json!({ "Fn::If": ["HasModels", { "application/json": "X" }, {}] });
        let mut resource = method(json!({
            "RequestParameters": params_ref.clone(),
            "RequestModels": models_if.clone()
        }));
        let doc = docs(json!({
            "queryParams": [{ "name": "limit" }],
            "requestModels": { "application/json": "Pet" }
        }));

        augment_method(&mut resource, &doc, false);

        assert_eq!(resource.properties["RequestParameters"], params_ref);
        assert_eq!(resource.properties["RequestModels"], models_if);
        assert!(resource.depends_on.is_empty());
    }

    #[test]
    fn test_request_parameters_keep_existing_keys() {
        let mut resource = method(json!({
            "RequestParameters": { "method.request.querystring.limit": true }
        }));
        let params = vec![
            Param { name: "limit".into(), description: None, required: Some(false) },
            Param { name: "offset".into(), description: None, required: None },
        ];

        add_request_parameters(&mut resource, &params, ParamLocation::QueryString);

        assert_eq!(
            resource.properties["RequestParameters"],
            json!({
                "method.request.querystring.limit": true,
                "method.request.querystring.offset": false
            })
        );
    }

    #[test]
    fn test_augment_method_safe_mode_skips_parameters() {
        let doc = docs(json!({
            "pathParams": [{ "name": "id", "required": true }],
            "requestHeaders": [{ "name": "X-Api-Key" }]
        }));

        let mut safe = method(json!({}));
        augment_method(&mut safe, &doc, true);
        assert!(!safe.properties.contains_key("RequestParameters"));

        let mut full = method(json!({}));
        augment_method(&mut full, &doc, false);
        assert_eq!(
            full.properties["RequestParameters"],
            json!({
                "method.request.header.X-Api-Key": false,
                "method.request.path.id": true
            })
        );
    }

    #[test]
    fn test_augment_method_keeps_existing_dependencies() {
        let mut resource = method(json!({}));
        resource.depends_on.insert("ApiGatewayResourcePets".into());
        let doc = docs(json!({ "requestModels": { "application/json": "Pet" } }));

        augment_method(&mut resource, &doc, false);

        assert_eq!(
            resource.depends_on.iter().collect::<Vec<_>>(),
            vec!["ApiGatewayResourcePets", "PetModel"]
        );
    }
}
