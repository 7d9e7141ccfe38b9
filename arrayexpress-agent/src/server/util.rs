use testcontainers_modules::{
    mongo::Mongo,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};

const MONGO_PORT: u16 = 27017;

pub struct DevContainer {
    container: ContainerAsync<Mongo>,
}

impl DevContainer {
    /// # Errors
    pub async fn new(container_name: &str) -> anyhow::Result<Self> {
        let mongo_version = "7.0";

        let container = Mongo::default()
            .with_tag(mongo_version)
            .with_container_name(container_name)
            .start()
            .await?;

        Ok(Self { container })
    }

    /// # Errors
    pub async fn db_host(&self) -> anyhow::Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    /// # Errors
    pub async fn db_port(&self) -> anyhow::Result<u16> {
        Ok(self.container.get_host_port_ipv4(MONGO_PORT).await?)
    }

    /// # Errors
    pub async fn db_url(&self) -> anyhow::Result<String> {
        Ok(format!(
            "mongodb://{}:{}",
            self.db_host().await?,
            self.db_port().await?
        ))
    }
}
