use async_trait::async_trait;
use tokio::sync::Mutex;
use weather_core::{Coordinates, LocationError, LocationProvider, Permission};

/// Asks the user once per session before letting `inner` locate them.
#[derive(Debug)]
pub struct PromptedLocation<L> {
    inner: L,
    answer: Mutex<Option<Permission>>,
}

impl<L> PromptedLocation<L> {
    pub fn new(inner: L) -> Self {
        Self { inner, answer: Mutex::new(None) }
    }
}

#[async_trait]
impl<L: LocationProvider> LocationProvider for PromptedLocation<L> {
    async fn request_foreground_permission(&self) -> Permission {
        let mut answer = self.answer.lock().await;
        if let Some(permission) = *answer {
            return permission;
        }

        let asked = tokio::task::spawn_blocking(|| {
            inquire::Confirm::new("Allow weather to use your approximate location?")
                .with_default(true)
                .with_help_message("Your public IP address is used to look up coordinates")
                .prompt()
        })
        .await;

        let permission = match asked {
            Ok(Ok(granted)) => Permission::from(granted),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "permission prompt dismissed");
                Permission::Denied
            }
            Err(e) => {
                tracing::warn!(error = %e, "permission prompt task failed");
                Permission::Denied
            }
        };

        *answer = Some(permission);
        permission
    }

    async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        self.inner.current_coordinates().await
    }
}
