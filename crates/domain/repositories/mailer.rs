use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::mail::OutgoingMail;

#[automock]
#[async_trait]
pub trait MailSender {
    async fn send(&self, mail: OutgoingMail) -> Result<()>;
}
