//! An [AccountService] that talks to the GraphQL backend over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    Error,
    account::{Account, AccountId, AccountType, NewAccount},
    service::AccountService,
};

/// Where to find the GraphQL backend and how long to wait for it.
#[derive(Debug, Clone)]
pub struct GraphQlConfig {
    /// The URL of the GraphQL endpoint, e.g. "http://localhost:8082/graphql".
    pub endpoint: String,
    /// How long a single request may take, including reading the body.
    pub request_timeout: Duration,
}

struct Operation {
    name: &'static str,
    document: &'static str,
}

const GET_ALL_COMPTES: Operation = Operation {
    name: "GetAllComptes",
    document: "query GetAllComptes { allComptes { id solde dateCreation type } }",
};

const GET_COMPTES_BY_TYPE: Operation = Operation {
    name: "GetComptesByType",
    document: "query GetComptesByType($type: TypeCompte!) { \
        findByType(type: $type) { id solde dateCreation type } }",
};

const SAVE_COMPTE: Operation = Operation {
    name: "SaveCompte",
    document: "mutation SaveCompte($compte: CompteRequest!) { \
        saveCompte(compte: $compte) { id solde dateCreation type } }",
};

const DELETE_COMPTE: Operation = Operation {
    name: "DeleteCompte",
    document: "mutation DeleteCompte($id: ID!) { deleteCompte(id: $id) }",
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// A compte as it appears in GraphQL responses.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompteNode {
    id: AccountId,
    solde: f64,
    date_creation: String,
    #[serde(rename = "type")]
    account_type: AccountType,
}

impl From<CompteNode> for Account {
    fn from(node: CompteNode) -> Self {
        Account {
            id: node.id,
            balance: node.solde,
            creation_date: node.date_creation,
            account_type: node.account_type,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllComptesData {
    all_comptes: Vec<CompteNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComptesByTypeData {
    find_by_type: Vec<CompteNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveCompteData {
    save_compte: CompteNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCompteData {
    delete_compte: Option<bool>,
}

/// Sends the four compte operations to a GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlAccountService {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlAccountService {
    /// Create a client for the endpoint in `config`.
    ///
    /// # Errors
    /// Returns [Error::Transport] if the HTTP client cannot be built, e.g.
    /// because no TLS backend is available.
    pub fn new(config: GraphQlConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<T, Error> {
        tracing::debug!("sending {} to {}", operation.name, self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphQlRequest {
                query: operation.document,
                operation_name: operation.name,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let payload: GraphQlResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(error) if status.is_success() => {
                tracing::error!("{} returned a body that is not GraphQL: {error}", operation.name);
                return Err(Error::MalformedResponse(error.to_string()));
            }
            Err(_) => {
                tracing::error!("{} failed with HTTP status {status}", operation.name);
                return Err(Error::Transport(format!(
                    "{} failed with HTTP status {status}",
                    operation.name
                )));
            }
        };

        if let Some(errors) = payload.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|error| error.message)
                .collect::<Vec<_>>()
                .join("; ");
            tracing::error!("{} returned errors: {messages}", operation.name);

            return Err(Error::GraphQl(messages));
        }

        if !status.is_success() {
            tracing::error!("{} failed with HTTP status {status}", operation.name);
            return Err(Error::Transport(format!(
                "{} failed with HTTP status {status}",
                operation.name
            )));
        }

        let data = payload.data.ok_or_else(|| {
            Error::MalformedResponse(format!("{} response has no data", operation.name))
        })?;

        serde_json::from_value(data).map_err(|error| {
            tracing::error!("could not decode {} data: {error}", operation.name);
            Error::MalformedResponse(error.to_string())
        })
    }
}

#[async_trait]
impl AccountService for GraphQlAccountService {
    async fn all_accounts(&self) -> Result<Vec<Account>, Error> {
        let data: AllComptesData = self.execute(&GET_ALL_COMPTES, json!({})).await?;

        Ok(data.all_comptes.into_iter().map(Account::from).collect())
    }

    async fn accounts_by_type(&self, account_type: AccountType) -> Result<Vec<Account>, Error> {
        let data: ComptesByTypeData = self
            .execute(&GET_COMPTES_BY_TYPE, json!({ "type": account_type }))
            .await?;

        Ok(data.find_by_type.into_iter().map(Account::from).collect())
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        let variables = json!({
            "compte": {
                "solde": new_account.balance,
                "type": new_account.account_type,
            }
        });
        let data: SaveCompteData = self.execute(&SAVE_COMPTE, variables).await?;

        Ok(data.save_compte.into())
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), Error> {
        let data: DeleteCompteData = self.execute(&DELETE_COMPTE, json!({ "id": id })).await?;

        match data.delete_compte {
            Some(true) => Ok(()),
            _ => Err(Error::DeleteMissingAccount),
        }
    }
}
