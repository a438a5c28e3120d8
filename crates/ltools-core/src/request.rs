//! Deployment request payloads rendered from a resolved configuration.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::resolver::ResolvedConfig;

/// Function settings in the shape the deployment API accepts for create and
/// update-configuration calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionRequest {
    pub function_name: String,
    pub runtime: String,
    pub role: String,
    pub handler: String,
    pub description: String,
    pub timeout: i64,
    pub memory_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_config: Option<VpcRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentRequest>,
    #[serde(rename = "KMSKeyArn", skip_serializing_if = "Option::is_none")]
    pub kms_key_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing_config: Option<TracingRequest>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcRequest {
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeadLetterRequest {
    pub target_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentRequest {
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TracingRequest {
    pub mode: String,
}

impl ResolvedConfig {
    /// Render the deployment request for one function.
    pub fn function_request(&self, name: &str) -> Result<FunctionRequest> {
        let function = self
            .config()
            .functions
            .get(name)
            .ok_or_else(|| Error::FunctionNotFound {
                name: name.to_string(),
            })?;
        let deploy = function
            .deploy
            .as_ref()
            .ok_or_else(|| Error::NotDeployable {
                name: name.to_string(),
            })?;

        Ok(FunctionRequest {
            function_name: name.to_string(),
            runtime: function.runtime.as_str().to_string(),
            role: deploy.role.clone(),
            handler: deploy.handler.clone(),
            description: deploy.description.clone(),
            timeout: deploy.timeout,
            memory_size: deploy.memory_size,
            vpc_config: deploy.vpc_config.as_ref().map(|vpc| VpcRequest {
                subnet_ids: vpc.subnets.iter().filter_map(|s| s.id.clone()).collect(),
                security_group_ids: vpc
                    .security_groups
                    .iter()
                    .filter_map(|sg| sg.id.clone())
                    .collect(),
            }),
            dead_letter_config: deploy
                .dead_letter_config
                .as_ref()
                .and_then(|dl| dl.target_arn.clone())
                .map(|target_arn| DeadLetterRequest { target_arn }),
            environment: deploy.environment.as_ref().map(|env| EnvironmentRequest {
                variables: env
                    .variables
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
                    .collect(),
            }),
            kms_key_arn: deploy.kms_key.as_ref().and_then(|key| key.arn.clone()),
            tracing_config: deploy.tracing_config.as_ref().map(|tracing| TracingRequest {
                mode: tracing.mode.as_str().to_string(),
            }),
            tags: deploy
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
                .collect(),
        })
    }

    /// Requests for every function that has a deploy block.
    pub fn function_requests(&self) -> Vec<FunctionRequest> {
        self.config()
            .functions
            .iter()
            .filter(|(_, function)| function.deploy.is_some())
            .filter_map(|(name, _)| self.function_request(name).ok())
            .collect()
    }
}
