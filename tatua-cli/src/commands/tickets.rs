//! `tatua add`, `edit`, `delete` and `show`

use chrono::Utc;
use tatua_lib::tickets::Ticket;
use tatua_lib::tickets::TicketForm;
use tatua_lib::tickets::TicketPatch;

use super::Context;
use crate::cli::AddArgs;
use crate::cli::EditArgs;
use crate::error::CliError;

impl From<AddArgs> for TicketForm {
    fn from(args: AddArgs) -> Self {
        Self {
            full_name: args.name,
            email: args.email,
            phone: args.phone,
            subject: args.subject,
            message: args.message,
            preferred_contact: args.contact,
            terms_accepted: args.accept_terms,
            attachment: args.attachment,
        }
    }
}

impl From<EditArgs> for TicketPatch {
    fn from(args: EditArgs) -> Self {
        Self {
            full_name: args.name,
            email: args.email,
            phone: args.phone,
            subject: args.subject,
            description: args.message,
            preferred_contact: args.contact,
            attachment: args.attachment,
        }
    }
}

pub async fn add(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    let mut book = ctx.book().await?;
    let ticket = TicketForm::from(args).into_ticket(book.next_id(), Utc::now())?;
    let id = book.add(ticket);
    ctx.save(&book).await?;

    log::info!("Raised ticket {}", id);
    println!("Created ticket #{}", id);
    Ok(())
}

pub async fn edit(ctx: &Context, id: u64, args: EditArgs) -> Result<(), CliError> {
    let patch = TicketPatch::from(args);
    if patch.is_empty() {
        return Err(CliError::Usage("Nothing to change; pass at least one field".to_string()));
    }
    patch.validate()?;

    let mut book = ctx.book().await?;
    let ticket = book.find_mut(id).ok_or(CliError::NotFound(id))?;
    patch.apply(ticket);
    ctx.save(&book).await?;

    log::info!("Updated ticket {}", id);
    println!("Updated ticket #{}", id);
    Ok(())
}

pub async fn delete(ctx: &Context, id: u64) -> Result<(), CliError> {
    let mut book = ctx.book().await?;
    let removed = book.delete(id)?;
    ctx.save(&book).await?;

    log::info!("Deleted ticket {}", id);
    println!("Deleted ticket #{} ({})", removed.id, removed.subject);
    Ok(())
}

pub async fn show(ctx: &Context, id: u64) -> Result<(), CliError> {
    let book = ctx.book().await?;
    let ticket = book.find(id).ok_or(CliError::NotFound(id))?;
    print!("{}", describe(ticket));
    Ok(())
}

/// Renders every field of a ticket, one per line.
fn describe(ticket: &Ticket) -> String {
    let mut out = format!(
        "Ticket #{}\n\
         Subject:      {}\n\
         Raised by:    {}\n\
         Email:        {}\n\
         Phone:        {}\n\
         Contact via:  {}\n\
         Created:      {}\n",
        ticket.id,
        ticket.subject,
        ticket.full_name,
        ticket.email,
        ticket.phone,
        ticket.preferred_contact,
        ticket.created_at.format("%Y-%m-%d %H:%M"),
    );
    if let Some(attachment) = &ticket.attachment {
        out.push_str(&format!("Attachment:   {}\n", attachment));
    }
    if let Some(url) = &ticket.attachment_url {
        out.push_str(&format!("Download:     {}\n", url));
    }
    out.push_str(&format!("\n{}\n", ticket.description));
    out
}

#[cfg(test)]
mod tests {
    use tatua_lib::tickets::PreferredContact;
    use tatua_lib::tickets::TicketBook;

    use super::*;

    fn context(dir: &tempfile::TempDir) -> Context {
        Context::resolve(Some(dir.path().join("tickets.json")), None).unwrap()
    }

    fn add_args() -> AddArgs {
        AddArgs {
            name: "Ann Lee".into(),
            email: "ann@example.com".into(),
            phone: "555-0100".into(),
            subject: "Login fails".into(),
            message: "Password reset loops".into(),
            contact: PreferredContact::Email,
            attachment: Some("trace.pdf".into()),
            accept_terms: true,
        }
    }

    fn no_edits() -> EditArgs {
        EditArgs {
            name: None,
            email: None,
            phone: None,
            subject: None,
            message: None,
            contact: None,
            attachment: None,
        }
    }

    #[tokio::test]
    async fn test_add_edit_delete() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        add(&ctx, add_args()).await.unwrap();
        add(&ctx, add_args()).await.unwrap();

        let mut edits = no_edits();
        edits.subject = Some("Login works again".into());
        edits.contact = Some(PreferredContact::Phone);
        edit(&ctx, 2, edits).await.unwrap();

        let book: TicketBook = ctx.book().await.unwrap();
        assert_eq!(book.len(), 2);
        let ticket = book.find(2).unwrap();
        assert_eq!(ticket.subject, "Login works again");
        assert_eq!(ticket.contact(), "555-0100");

        delete(&ctx, 1).await.unwrap();
        let book = ctx.book().await.unwrap();
        assert_eq!(book.len(), 1);
        assert!(book.find(1).is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_form() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        let mut args = add_args();
        args.email = "not-an-email".into();
        args.accept_terms = false;

        let err = add(&ctx, args).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Invalid email format"));
        assert!(message.contains("You must accept the terms and conditions"));
        assert!(ctx.book().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        add(&ctx, add_args()).await.unwrap();

        assert!(matches!(
            edit(&ctx, 1, no_edits()).await,
            Err(CliError::Usage(_))
        ));

        let mut edits = no_edits();
        edits.subject = Some("x".into());
        assert!(matches!(edit(&ctx, 9, edits).await, Err(CliError::NotFound(9))));
        assert!(matches!(delete(&ctx, 9).await, Err(CliError::NotFound(9))));
    }

    #[test]
    fn test_describe() {
        let ticket = TicketForm::from(add_args())
            .into_ticket(7, Utc::now())
            .unwrap();
        let text = describe(&ticket);
        assert!(text.starts_with("Ticket #7\n"));
        assert!(text.contains("Attachment:   trace.pdf"));
        assert!(!text.contains("Download:"));
        assert!(text.ends_with("Password reset loops\n"));
    }

    #[test]
    fn test_describe_download_link() {
        let mut ticket = TicketForm::from(add_args())
            .into_ticket(8, Utc::now())
            .unwrap();
        ticket.attachment_url = Some("https://files.example.com/trace.pdf".into());

        let text = describe(&ticket);
        assert!(text.contains("Subject:      Login fails\n"));
        assert!(text.contains("Contact via:  email\n"));
        assert!(text.contains("Download:     https://files.example.com/trace.pdf\n"));
    }
}
