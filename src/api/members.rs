use super::client::{RoutingClient, error_body};
use super::models::{Member, MembersPage};
use crate::error::MembershipError;

/// Walks the paged queue-membership endpoint
#[derive(Debug, Clone)]
pub struct MemberLister {
    client: RoutingClient,
    queue_id: String,
    page_size: u32,
}

impl MemberLister {
    pub fn new(client: RoutingClient, queue_id: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            queue_id: queue_id.into(),
            page_size: page_size.max(1),
        }
    }

    /// Every member of the queue, in response order.
    ///
    /// Pages are requested from 1 while the previous page carried a
    /// `nextUri`. A failure on any page fails the whole listing.
    pub async fn list_members(&self, token: &str) -> Result<Vec<Member>, MembershipError> {
        let url = self.client.endpoints().queue_members_url(&self.queue_id);
        let mut members = Vec::new();
        let mut page_number = 1u32;

        loop {
            let page = self.fetch_page(&url, token, page_number).await?;
            self.client.metrics().record_members_page();

            log::debug!(
                "Members page {} returned {} entities (next: {})",
                page_number,
                page.entities.len(),
                page.has_next()
            );

            let has_next = page.has_next();
            members.extend(page.entities.into_iter().map(|e| e.into_member()));

            if !has_next {
                break;
            }
            page_number += 1;
        }

        log::info!(
            "Listed {} members of queue {} across {} page(s)",
            members.len(),
            self.queue_id,
            page_number
        );
        Ok(members)
    }

    async fn fetch_page(
        &self,
        url: &str,
        token: &str,
        page: u32,
    ) -> Result<MembersPage, MembershipError> {
        let query = [
            ("pageSize", self.page_size.to_string()),
            ("pageNumber", page.to_string()),
        ];

        let response = self
            .client
            .get_with_token("queue members", url, token, &query)
            .await
            .map_err(|source| MembershipError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MembershipError::Rejected {
                page,
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| MembershipError::Transport { page, source })?;

        serde_json::from_str(&body).map_err(|e| MembershipError::InvalidResponse {
            page,
            reason: e.to_string(),
        })
    }
}
