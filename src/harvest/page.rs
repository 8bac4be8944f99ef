// src/harvest/page.rs
use crate::directory::{DirectoryClient, StaffRecord};
use crate::extractors::{collect_rows, RoleClassifier, RowDraft};
use crate::utils::error::FetchError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Shared, read-only state every row task of a page needs.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub client: DirectoryClient,
    pub classifier: Arc<RoleClassifier>,
    pub workers: usize,
}

/// Fetches one directory page and extracts its staff records.
///
/// Rows are finished on a task group bounded to `workers` that lives only
/// for this call. Records come back in completion order, not row order.
pub async fn harvest_page(
    ctx: &PageContext,
    page_url: &str,
    school: &str,
) -> Result<Vec<StaffRecord>, FetchError> {
    let parsed_url =
        Url::parse(page_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", page_url, e)))?;
    let html = ctx.client.fetch_page(page_url).await?;

    // The DOM is dropped here; only owned drafts cross into tasks
    let drafts = collect_rows(&html, &parsed_url);
    tracing::debug!("{} table rows on {}", drafts.len(), page_url);

    let permits = Arc::new(Semaphore::new(ctx.workers.max(1)));
    let mut tasks = JoinSet::new();

    for (index, draft) in drafts.into_iter().enumerate() {
        let draft = match draft {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!("Skipping row {} on {}: {}", index, page_url, e);
                continue;
            }
        };

        let permits = Arc::clone(&permits);
        let client = ctx.client.clone();
        let classifier = Arc::clone(&ctx.classifier);
        let page_url = page_url.to_string();
        let school = school.to_string();

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            finish_row(&client, &classifier, &page_url, &school, draft).await
        });
    }

    let mut records = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => tracing::warn!("Row task on {} did not finish: {}", page_url, e),
        }
    }

    Ok(records)
}

/// Resolves the email of a drafted row, then turns it into a record.
async fn finish_row(
    client: &DirectoryClient,
    classifier: &RoleClassifier,
    page_url: &str,
    school: &str,
    draft: RowDraft,
) -> Option<StaffRecord> {
    let email = match &draft.email_trigger {
        Ok(trigger) => match client.resolve_email(page_url, trigger).await {
            Ok(email) => Some(email),
            Err(e) => {
                tracing::debug!("No email for {}: {}", draft.name, e);
                None
            }
        },
        Err(e) => {
            tracing::debug!("No email for {}: {}", draft.name, e);
            None
        }
    };

    build_record(draft, school, email, classifier)
}

/// Applies the blacklist and assembles the final record.
///
/// Runs after every field has been attempted, so a blacklisted row is
/// dropped even though its email lookup already happened.
pub fn build_record(
    draft: RowDraft,
    school: &str,
    email: Option<String>,
    classifier: &RoleClassifier,
) -> Option<StaffRecord> {
    let role = draft.role.ok();
    if classifier.is_blacklisted(role.as_deref()) {
        tracing::debug!(
            "Skipping {}: blacklisted role '{}'",
            draft.name,
            role.as_deref().unwrap_or_default()
        );
        return None;
    }

    let phone_number = match draft.phone {
        Ok(phone) => Some(phone),
        Err(e) => {
            tracing::trace!("No phone for {}: {}", draft.name, e);
            None
        }
    };

    let record = StaffRecord {
        name: draft.name,
        image_url: draft.image_url,
        school: school.to_string(),
        role,
        email,
        phone_number,
    };
    tracing::info!("Harvested {} ({})", record.name, record.school);
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ClientSettings;
    use crate::utils::error::ExtractError;
    use mockito::Matcher;

    const STAFF_PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>Bilde</th><th>Navn</th><th>Kontakt</th></tr>
          <tr>
            <td><img src="bilder/ada.jpg"></td>
            <td><strong>Ada  Lovelace</strong><br>Kontaktlærer 7A</td>
            <td>Mobil: 123 45 678
              <a class="m-sendEmailToUser" data-id="501" data-emailtype="arb">E-post</a>
            </td>
          </tr>
          <tr>
            <td><img src="bilder/bjorn.jpg"></td>
            <td><strong>Bjørn Berg</strong><br>Rektor</td>
            <td>Tlf. arb.: 22 33 44 55</td>
          </tr>
          <tr>
            <td><img src="bilder/cecilie.jpg"></td>
            <td><strong>Cecilie Dahl</strong><br>SFO-assistent</td>
            <td><a class="m-sendEmailToUser" data-id="503" data-emailtype="arb">E-post</a></td>
          </tr>
          <tr>
            <td></td>
            <td><strong>Uten Bilde</strong><br>Lærer</td>
            <td></td>
          </tr>
        </table>
        </body></html>
    "#;

    fn context(workers: usize) -> PageContext {
        PageContext {
            client: DirectoryClient::new(&ClientSettings::default()).unwrap(),
            classifier: Arc::new(RoleClassifier::default()),
            workers,
        }
    }

    fn draft(role: Result<String, ExtractError>) -> RowDraft {
        RowDraft {
            name: "Kari Nordmann".to_string(),
            image_url: "https://site.example/img/k.jpg".to_string(),
            role,
            phone: Err(ExtractError::PhoneNotFound),
            email_trigger: Err(ExtractError::MissingEmailTrigger),
        }
    }

    #[test]
    fn blacklisted_role_yields_no_record() {
        let classifier = RoleClassifier::default();
        let email = Some("kari@skole.example".to_string());

        assert!(build_record(draft(Ok("sfo ASSISTENT".into())), "Nordby", email.clone(), &classifier).is_none());

        let record = build_record(draft(Ok("Lærer".into())), "Nordby", email, &classifier).unwrap();
        assert_eq!(record.role.as_deref(), Some("Lærer"));
        assert_eq!(record.phone_number, None);
    }

    #[test]
    fn missing_role_is_kept() {
        let classifier = RoleClassifier::default();
        let record = build_record(draft(Err(ExtractError::MissingRole)), "Nordby", None, &classifier).unwrap();
        assert_eq!(record.role, None);
        assert_eq!(record.school, "Nordby");
    }

    #[tokio::test]
    async fn page_rows_are_extracted_and_filtered() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/skole/ansatte.php")
            .with_body(STAFF_PAGE)
            .create_async()
            .await;
        let _email = server
            .mock("POST", "/skole/ansatte.php")
            .match_query(Matcher::UrlEncoded("show".into(), "ajax".into()))
            .match_body(Matcher::UrlEncoded("emailID".into(), "501".into()))
            .with_body("ada@skole.example")
            .create_async()
            .await;

        let url = format!("{}/skole/ansatte.php", server.url());
        let mut records = harvest_page(&context(2), &url, "Nordby skole").await.unwrap();
        records.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(records.len(), 2);

        let ada = &records[0];
        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.image_url, format!("{}/skole/bilder/ada.jpg", server.url()));
        assert_eq!(ada.email.as_deref(), Some("ada@skole.example"));
        assert_eq!(ada.phone_number, Some(12345678));
        assert_eq!(ada.role.as_deref(), Some("Kontaktlærer 7A"));

        let bjorn = &records[1];
        assert_eq!(bjorn.name, "Bjørn Berg");
        assert_eq!(bjorn.email, None);
        assert_eq!(bjorn.phone_number, Some(22334455));
        assert_eq!(bjorn.school, "Nordby skole");
    }

    #[tokio::test]
    async fn unreachable_page_is_an_error() {
        let result = harvest_page(&context(1), "http://127.0.0.1:1/ansatte.php", "Nordby").await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn invalid_page_url_is_an_error() {
        let result = harvest_page(&context(1), "ansatte.php", "Nordby").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
