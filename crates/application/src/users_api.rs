//! The users resource contract: request factories and a typed client.

use std::sync::Arc;

use reqres_domain::{
    HttpMethod, HttpResponse, PathTemplate, RequestSpec, ResolvedRequest, ResponseSpec,
    SingleUserRecord, UserListRecord, UserMutationRecord, UserPayload,
    contract::{
        API_KEY_HEADER, JSON_CONTENT_TYPE, PAGE_PARAM, STATUS_OK, USER_BY_ID_PATH, USER_ID_PARAM,
        USERS_PATH,
    },
    map_record,
};
use serde::de::DeserializeOwned;

use crate::error::{ApplicationError, ApplicationResult};
use crate::execute_request::ExecuteRequest;
use crate::ports::HttpClient;

/// Request factories for the six operations of the users resource.
///
/// Listing is anonymous; every other operation carries the API key and
/// declares a JSON body.
#[derive(Debug, Clone)]
pub struct UsersEndpoints {
    anonymous: RequestSpec,
    authenticated: RequestSpec,
    users: PathTemplate,
    user_by_id: PathTemplate,
}

impl UsersEndpoints {
    /// Derives the authenticated spec from `anonymous` and `api_key`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a resource path template is malformed.
    pub fn new(anonymous: RequestSpec, api_key: &str) -> ApplicationResult<Self> {
        let authenticated = anonymous
            .clone()
            .named(format!("{} (authenticated)", anonymous.name))
            .with_header(API_KEY_HEADER, api_key)
            .with_content_type(JSON_CONTENT_TYPE);
        Ok(Self {
            anonymous,
            authenticated,
            users: PathTemplate::parse(USERS_PATH)?,
            user_by_id: PathTemplate::parse(USER_BY_ID_PATH)?,
        })
    }

    /// Spec used for anonymous calls.
    #[must_use]
    pub const fn anonymous_spec(&self) -> &RequestSpec {
        &self.anonymous
    }

    /// Spec used for calls carrying the API key.
    #[must_use]
    pub const fn authenticated_spec(&self) -> &RequestSpec {
        &self.authenticated
    }

    /// `GET /users/?page={page}` without the API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not resolve.
    pub fn list_users(&self, page: u32) -> ApplicationResult<ResolvedRequest> {
        Ok(self
            .anonymous
            .request(HttpMethod::Get, &self.users)
            .query_param(PAGE_PARAM, page)
            .build()?)
    }

    /// `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not resolve.
    pub fn get_user(&self, id: u64) -> ApplicationResult<ResolvedRequest> {
        self.by_id(HttpMethod::Get, id, None)
    }

    /// `POST /users/` with `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not resolve or the
    /// payload does not serialize.
    pub fn create_user(&self, payload: &UserPayload) -> ApplicationResult<ResolvedRequest> {
        Ok(self
            .authenticated
            .request(HttpMethod::Post, &self.users)
            .json_body(payload)?
            .build()?)
    }

    /// `PATCH /users/{id}` with `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_user`].
    pub fn patch_user(&self, id: u64, payload: &UserPayload) -> ApplicationResult<ResolvedRequest> {
        self.by_id(HttpMethod::Patch, id, Some(payload))
    }

    /// `PUT /users/{id}` with `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_user`].
    pub fn put_user(&self, id: u64, payload: &UserPayload) -> ApplicationResult<ResolvedRequest> {
        self.by_id(HttpMethod::Put, id, Some(payload))
    }

    /// `DELETE /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not resolve.
    pub fn delete_user(&self, id: u64) -> ApplicationResult<ResolvedRequest> {
        self.by_id(HttpMethod::Delete, id, None)
    }

    fn by_id(
        &self,
        method: HttpMethod,
        id: u64,
        payload: Option<&UserPayload>,
    ) -> ApplicationResult<ResolvedRequest> {
        let mut builder = self
            .authenticated
            .request(method, &self.user_by_id)
            .path_param(USER_ID_PARAM, id);
        if let Some(payload) = payload {
            builder = builder.json_body(payload)?;
        }
        Ok(builder.build()?)
    }
}

/// Expected response of list and get.
#[must_use]
pub fn read_spec() -> ResponseSpec {
    ResponseSpec::ok().with_content_type(JSON_CONTENT_TYPE)
}

/// Expected response of create.
#[must_use]
pub fn created_spec() -> ResponseSpec {
    ResponseSpec::created().with_content_type(JSON_CONTENT_TYPE)
}

/// Expected response of patch and put.
#[must_use]
pub fn updated_spec() -> ResponseSpec {
    ResponseSpec::new("updated", STATUS_OK).with_content_type(JSON_CONTENT_TYPE)
}

/// Expected response of delete.
#[must_use]
pub fn deleted_spec() -> ResponseSpec {
    ResponseSpec::no_content()
}

/// Expected response for an unknown user.
#[must_use]
pub fn missing_spec() -> ResponseSpec {
    ResponseSpec::not_found()
}

/// Maps the body of `response` to `T`, attributing failures to `request`.
///
/// # Errors
///
/// Returns `ApplicationError::Mapping` if the body does not fit `T`.
pub fn decode<T: DeserializeOwned>(
    request: &ResolvedRequest,
    response: &HttpResponse,
) -> ApplicationResult<T> {
    map_record(response).map_err(|source| ApplicationError::Mapping {
        request: request.describe(),
        source,
    })
}

/// Typed async client for the users resource.
pub struct UsersClient<C: HttpClient> {
    execute: ExecuteRequest<C>,
    endpoints: UsersEndpoints,
}

impl<C: HttpClient> UsersClient<C> {
    /// Creates a client sending through `client`.
    pub const fn new(client: Arc<C>, endpoints: UsersEndpoints) -> Self {
        Self {
            execute: ExecuteRequest::new(client),
            endpoints,
        }
    }

    /// Request factories in use.
    #[must_use]
    pub const fn endpoints(&self) -> &UsersEndpoints {
        &self.endpoints
    }

    /// Fetches one page of users.
    ///
    /// # Errors
    ///
    /// `Transport`, `UnexpectedStatus`, `Assertion` (content type) or `Mapping`.
    pub async fn list_users(&self, page: u32) -> ApplicationResult<UserListRecord> {
        let request = self.endpoints.list_users(page)?;
        self.fetch(&request, &read_spec()).await
    }

    /// Fetches one user.
    ///
    /// # Errors
    ///
    /// See [`Self::list_users`].
    pub async fn get_user(&self, id: u64) -> ApplicationResult<SingleUserRecord> {
        let request = self.endpoints.get_user(id)?;
        self.fetch(&request, &read_spec()).await
    }

    /// Requests a user that must not exist and returns the raw 404 response.
    ///
    /// # Errors
    ///
    /// `UnexpectedStatus` if the user exists.
    pub async fn get_missing_user(&self, id: u64) -> ApplicationResult<HttpResponse> {
        let request = self.endpoints.get_user(id)?;
        self.execute.execute(&request, &missing_spec()).await
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// See [`Self::list_users`].
    pub async fn create_user(&self, payload: &UserPayload) -> ApplicationResult<UserMutationRecord> {
        let request = self.endpoints.create_user(payload)?;
        self.fetch(&request, &created_spec()).await
    }

    /// Partially updates a user.
    ///
    /// # Errors
    ///
    /// See [`Self::list_users`].
    pub async fn patch_user(
        &self,
        id: u64,
        payload: &UserPayload,
    ) -> ApplicationResult<UserMutationRecord> {
        let request = self.endpoints.patch_user(id, payload)?;
        self.fetch(&request, &updated_spec()).await
    }

    /// Replaces a user.
    ///
    /// # Errors
    ///
    /// See [`Self::list_users`].
    pub async fn put_user(
        &self,
        id: u64,
        payload: &UserPayload,
    ) -> ApplicationResult<UserMutationRecord> {
        let request = self.endpoints.put_user(id, payload)?;
        self.fetch(&request, &updated_spec()).await
    }

    /// Deletes a user and returns the raw 204 response.
    ///
    /// # Errors
    ///
    /// See [`Self::list_users`].
    pub async fn delete_user(&self, id: u64) -> ApplicationResult<HttpResponse> {
        let request = self.endpoints.delete_user(id)?;
        self.execute.execute(&request, &deleted_spec()).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: &ResolvedRequest,
        expected: &ResponseSpec,
    ) -> ApplicationResult<T> {
        let response = self.execute.execute(request, expected).await?;
        decode(request, &response)
    }
}
