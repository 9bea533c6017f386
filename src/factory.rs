//! Per-invocation dependency container handed to every command.
//!
//! A [`Factory`] can only be obtained through [`FactoryBuilder::build`], which
//! refuses to produce one without a renderer and a filesystem. The API client
//! is materialized on demand by [`Factory::materialize_client`], so commands
//! that never talk to the backend never validate connection options.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::client::{ClientCreator, MiaClient, Options};
use crate::error::{ApiError, FactoryError};
use crate::fs::Fs;
use crate::output::Renderer;

#[derive(Default)]
pub struct FactoryBuilder {
    renderer: Option<Renderer>,
    fs: Option<Fs>,
    client_creator: Option<Box<dyn ClientCreator>>,
    home_dir: PathBuf,
}

impl FactoryBuilder {
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn fs(mut self, fs: Fs) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn client_creator(mut self, creator: impl ClientCreator + 'static) -> Self {
        self.client_creator = Some(Box::new(creator));
        self
    }

    pub fn home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = home_dir.into();
        self
    }

    pub fn build(self) -> Result<Factory, FactoryError> {
        Ok(Factory {
            renderer: self.renderer.ok_or(FactoryError::MissingField("renderer"))?,
            fs: self.fs.ok_or(FactoryError::MissingField("fs"))?,
            client_creator: self.client_creator,
            home_dir: self.home_dir,
        })
    }
}

pub struct Factory {
    renderer: Renderer,
    fs: Fs,
    client_creator: Option<Box<dyn ClientCreator>>,
    home_dir: PathBuf,
}

impl Factory {
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::default()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn fs(&self) -> &Fs {
        &self.fs
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Build the API client for `opts`. On failure nothing is kept.
    pub fn materialize_client(&self, opts: &Options) -> Result<ConnectedFactory<'_>, ApiError> {
        let creator = self
            .client_creator
            .as_ref()
            .ok_or_else(|| ApiError::CreateClient("newSdk not defined".to_string()))?;

        let client = creator.create(opts)?;
        debug!(base_url = %opts.api_base_url, "api client ready");

        Ok(ConnectedFactory {
            factory: self,
            client,
        })
    }
}

/// A [`Factory`] whose API client has been built.
pub struct ConnectedFactory<'a> {
    factory: &'a Factory,
    client: MiaClient,
}

impl ConnectedFactory<'_> {
    pub fn renderer(&self) -> &Renderer {
        self.factory.renderer()
    }

    pub fn client(&self) -> &MiaClient {
        &self.client
    }
}

/// Execution context of one command run: the resolved connection options
/// plus the factory attached at startup. Lives for the whole process.
pub struct CommandContext {
    options: Options,
    factory: Option<Factory>,
}

impl CommandContext {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            factory: None,
        }
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The attached factory, without building an API client.
    pub fn factory(&self) -> Result<&Factory, FactoryError> {
        self.factory.as_ref().ok_or(FactoryError::NotAttached)
    }

    /// The attached factory with its API client materialized from the
    /// context options.
    pub fn connect(&self) -> crate::error::Result<ConnectedFactory<'_>> {
        let factory = self.factory()?;
        Ok(factory.materialize_client(&self.options)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::client::{ClientCreator, MiaClient, Options};
    use crate::error::ApiError;
    use crate::fs::Fs;
    use crate::output::testing::SharedBuffer;
    use crate::output::Renderer;
    use crate::projects::ProjectsApi;
    use crate::types::Project;

    use super::{Factory, FactoryBuilder};

    /// Canned answer for [`MockProjects::get`].
    #[derive(Clone)]
    pub enum MockResponse {
        Projects(Vec<Project>),
        Http(u16, String),
        Generic(String),
    }

    pub struct MockProjects {
        pub response: MockResponse,
    }

    #[async_trait]
    impl ProjectsApi for MockProjects {
        async fn get(&self) -> Result<Vec<Project>, ApiError> {
            match &self.response {
                MockResponse::Projects(projects) => Ok(projects.clone()),
                MockResponse::Http(status, body) => Err(ApiError::Http {
                    method: "GET".to_string(),
                    url: "http://mock/api/backend/projects/".to_string(),
                    status: *status,
                    body: body.clone(),
                }),
                MockResponse::Generic(detail) => Err(ApiError::Generic(detail.clone())),
            }
        }
    }

    /// Builds stub clients without any I/O and records the options it saw.
    #[derive(Clone)]
    pub struct MockClientCreator {
        pub response: MockResponse,
        pub fail_with: Option<String>,
        pub seen: Arc<Mutex<Vec<Options>>>,
    }

    impl MockClientCreator {
        pub fn returning(response: MockResponse) -> Self {
            Self {
                response,
                fail_with: None,
                seen: Arc::default(),
            }
        }

        pub fn failing(detail: &str) -> Self {
            Self {
                fail_with: Some(detail.to_string()),
                ..Self::returning(MockResponse::Projects(Vec::new()))
            }
        }
    }

    impl ClientCreator for MockClientCreator {
        fn create(&self, opts: &Options) -> Result<MiaClient, ApiError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(opts.clone());
            }
            if let Some(detail) = &self.fail_with {
                return Err(ApiError::CreateClient(detail.clone()));
            }
            Ok(MiaClient {
                projects: Box::new(MockProjects {
                    response: self.response.clone(),
                }),
            })
        }
    }

    pub struct TestFactory {
        pub factory: Factory,
        pub out: SharedBuffer,
        pub err: SharedBuffer,
    }

    pub fn test_factory(creator: Option<MockClientCreator>, json: bool) -> TestFactory {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let mut builder: FactoryBuilder = Factory::builder()
            .renderer(Renderer::new(out.clone(), err.clone(), json))
            .fs(Fs::memory())
            .home_dir("/home");
        if let Some(creator) = creator {
            builder = builder.client_creator(creator);
        }
        TestFactory {
            factory: builder.build().expect("factory"),
            out,
            err,
        }
    }
}
