use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::error;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct Error(String);

impl Error {
    pub fn new(s: &str) -> Error {
        Error(s.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self(e.to_string())
    }
}

#[async_trait]
pub trait Service {
    type Context: Clone + Send;
    async fn new(context: Self::Context) -> Self;
    async fn run(self) -> Result<(), Error>;
}

pub struct ServiceManager<C> {
    context: C,
    services: JoinSet<Result<(), Error>>,
}

impl<C> ServiceManager<C>
where
    C: 'static + Clone + Send,
{
    pub fn new(context: C) -> Self {
        Self {
            context,
            services: JoinSet::new(),
        }
    }

    pub fn spawn<T>(&mut self)
    where
        T: Service<Context = C> + Send + 'static,
    {
        let context = self.context.clone();
        self.services.spawn(async move {
            let service = T::new(context).await;
            service.run().await.inspect_err(|e| error!("Service stopped: {}", e))
        });
    }

    // Services are expected to run forever, so the first one to finish is a failure
    pub async fn wait(&mut self) -> Result<(), Error> {
        match self.services.join_next().await {
            Some(Ok(Err(e))) => Err(e),
            Some(Ok(Ok(()))) => Err(Error::new("Service exited")),
            Some(Err(e)) => Err(Error::from(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Service for Failing {
        type Context = String;

        async fn new(_context: String) -> Self {
            Self
        }

        async fn run(self) -> Result<(), Error> {
            Err(Error::new("bind failed"))
        }
    }

    #[tokio::test]
    async fn test_wait_reports_failed_service() {
        let mut manager = ServiceManager::new("ctx".to_string());
        manager.spawn::<Failing>();
        let result = manager.wait().await;
        assert_eq!(result.unwrap_err().to_string(), "bind failed");
    }

    #[tokio::test]
    async fn test_wait_without_services() {
        let mut manager = ServiceManager::new(());
        assert!(manager.wait().await.is_ok());
    }
}
