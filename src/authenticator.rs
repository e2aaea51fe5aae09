//! The authenticator: construction, resolution entry points, and binding.

use std::fmt;
use std::sync::Arc;

use crate::authorizer::AuthorizerHandle;
use crate::cache::AuthorizerCache;
use crate::client::ResourceClient;
use crate::config::AuthConfig;
use crate::environment::EnvironmentSettings;
use crate::error::AuthError;
use crate::resolver::Resolver;
use crate::sources::{
    CliCredentialSource, CredentialSource, EnvCredentialSource, FileCredentialSource,
};

/// Resolves credentials and authorizes service clients.
///
/// Construction is the only fallible setup step: ambient settings are read
/// once and every later operation works against that snapshot. The default
/// source chain tries the auth file, then the Azure CLI, then service
/// principal environment variables.
///
/// ```no_run
/// use azauth::{AuthConfig, Authenticator};
///
/// # fn main() -> Result<(), azauth::AuthError> {
/// let auth = Authenticator::new(AuthConfig::new().with_user_agent("mytool/1.4"))?;
/// let mut client = auth.new_client();
/// auth.authorize_client(&mut client)?;
/// # Ok(())
/// # }
/// ```
pub struct Authenticator {
    config: AuthConfig,
    settings: EnvironmentSettings,
    http: reqwest::blocking::Client,
    resolver: Resolver,
    file_source: Arc<FileCredentialSource>,
    management: AuthorizerCache,
}

impl Authenticator {
    /// Creates an authenticator from ambient environment settings.
    ///
    /// Fails with [`AuthError::SettingsUnavailable`] when `AZURE_ENVIRONMENT`
    /// names an unknown cloud; an unset variable selects the public cloud.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let settings = EnvironmentSettings::from_environment()?;
        Self::with_settings(config, settings)
    }

    /// Creates an authenticator with explicit settings, bypassing the
    /// process environment.
    pub fn with_settings(
        config: AuthConfig,
        settings: EnvironmentSettings,
    ) -> Result<Self, AuthError> {
        let (http, file_source) = Self::foundation(&config)?;
        let sources: Vec<Arc<dyn CredentialSource>> = vec![
            file_source.clone(),
            Arc::new(CliCredentialSource::new().with_program(config.cli_program.clone())),
            Arc::new(EnvCredentialSource::new(
                settings.environment.clone(),
                http.clone(),
            )),
        ];
        Self::assemble(config, settings, http, file_source, sources)
    }

    /// Creates an authenticator over a caller-supplied source chain.
    ///
    /// The chain is tried front to back. File-specific operations keep
    /// working regardless of whether the chain contains a file source.
    pub fn with_source_chain(
        config: AuthConfig,
        settings: EnvironmentSettings,
        sources: Vec<Arc<dyn CredentialSource>>,
    ) -> Result<Self, AuthError> {
        let (http, file_source) = Self::foundation(&config)?;
        Self::assemble(config, settings, http, file_source, sources)
    }

    fn foundation(
        config: &AuthConfig,
    ) -> Result<(reqwest::blocking::Client, Arc<FileCredentialSource>), AuthError> {
        config.validate()?;
        let http = config.http.build_blocking_client()?;
        let mut file_source = FileCredentialSource::new(http.clone());
        if let Some(path) = &config.auth_file {
            file_source = file_source.with_path(path.clone());
        }
        Ok((http, Arc::new(file_source)))
    }

    fn assemble(
        config: AuthConfig,
        settings: EnvironmentSettings,
        http: reqwest::blocking::Client,
        file_source: Arc<FileCredentialSource>,
        sources: Vec<Arc<dyn CredentialSource>>,
    ) -> Result<Self, AuthError> {
        let resolver = Resolver::new(
            sources,
            settings.environment.resource_manager_endpoint.clone(),
        );
        tracing::debug!(
            target: "azauth",
            environment = %settings.environment.name,
            sources = resolver.sources().len(),
            "authenticator ready"
        );
        Ok(Self {
            config,
            settings,
            http,
            resolver,
            file_source,
            management: AuthorizerCache::new(),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Creates an unauthorized client sharing this authenticator's
    /// connection pool, seeded with the configured base user agent.
    pub fn new_client(&self) -> ResourceClient {
        let client = ResourceClient::from_client(self.http.clone());
        match &self.config.http.user_agent {
            Some(user_agent) => client.with_user_agent(user_agent.clone()),
            None => client,
        }
    }

    /// Resolves an authorizer for the management scope, caching the result.
    ///
    /// The first call runs the source chain; concurrent first calls share
    /// that one resolution. Later calls return the cached authorizer.
    pub fn management_authorizer(&self) -> Result<AuthorizerHandle, AuthError> {
        self.management
            .get_or_resolve(|| self.resolver.resolve_default())
    }

    /// Resolves an authorizer for an arbitrary resource scope.
    ///
    /// Never cached: each call walks the source chain.
    pub fn authorizer_for_resource(&self, resource: &str) -> Result<AuthorizerHandle, AuthError> {
        self.resolver.resolve_for_resource(resource)
    }

    /// Resolves an authorizer from the auth file alone, scoped to the
    /// management endpoint.
    pub fn file_authorizer(&self) -> Result<AuthorizerHandle, AuthError> {
        self.file_authorizer_for_resource(&self.settings.environment.resource_manager_endpoint)
    }

    /// Resolves an authorizer from the auth file alone, scoped to
    /// `resource`.
    pub fn file_authorizer_for_resource(
        &self,
        resource: &str,
    ) -> Result<AuthorizerHandle, AuthError> {
        Ok(self.file_source.resolve(resource)?)
    }

    /// Resolves an authorizer for `resource` and binds it to `client`,
    /// appending `user_agent_tag` to the client's identification string.
    ///
    /// On failure the client is left untouched: the tag is only appended
    /// once an authorizer has been attached.
    pub fn bind_resource(
        &self,
        client: &mut ResourceClient,
        resource: &str,
        user_agent_tag: &str,
    ) -> Result<(), AuthError> {
        let authorizer = self.resolver.resolve_for_resource(resource)?;
        attach(client, authorizer, user_agent_tag);
        Ok(())
    }

    /// Authorizes `client` for the management scope using the cached
    /// authorizer and the configured user-agent tag.
    pub fn authorize_client(&self, client: &mut ResourceClient) -> Result<(), AuthError> {
        let authorizer = self.management_authorizer()?;
        attach(client, authorizer, &self.config.user_agent);
        Ok(())
    }

    /// Authorizes `client` for `resource` using the configured user-agent
    /// tag. Resolution is uncached.
    pub fn authorize_client_for_resource(
        &self,
        client: &mut ResourceClient,
        resource: &str,
    ) -> Result<(), AuthError> {
        self.bind_resource(client, resource, &self.config.user_agent)
    }

    /// Authorizes `client` for the management scope from the auth file
    /// alone.
    pub fn authorize_client_from_file(&self, client: &mut ResourceClient) -> Result<(), AuthError> {
        let authorizer = self.file_authorizer()?;
        attach(client, authorizer, &self.config.user_agent);
        Ok(())
    }

    /// Authorizes `client` for `resource` from the auth file alone.
    pub fn authorize_client_from_file_for_resource(
        &self,
        client: &mut ResourceClient,
        resource: &str,
    ) -> Result<(), AuthError> {
        let authorizer = self.file_authorizer_for_resource(resource)?;
        attach(client, authorizer, &self.config.user_agent);
        Ok(())
    }
}

fn attach(client: &mut ResourceClient, authorizer: AuthorizerHandle, user_agent_tag: &str) {
    client.set_authorizer(authorizer);
    if !user_agent_tag.is_empty() {
        client.add_to_user_agent(user_agent_tag);
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("environment", &self.settings.environment.name)
            .field("user_agent", &self.config.user_agent)
            .field("sources", &self.resolver.sources().len())
            .finish_non_exhaustive()
    }
}
