//! Execution of parsed CLI commands against a live session.

use anyhow::{Context, Result, bail};
use epp_client::{Response, Session, Transport};
use epp_types::{
    ContactAttr, ContactChange, ContactCreate, ContactType, DomainAttr, DomainChange,
    DomainContact, DomainCreate, DomainUpdate, Extension, FeeQuery, HostAttr, HostChange,
    HostsFilter, Period, PostalInfo, Status, UpdateOp,
};
use tokio::io::AsyncReadExt;

use crate::config::Profile;
use crate::output::emit;
use crate::{
    CheckArgs, Command, CreateCommand, DeleteCommand, ExtensionArgs, InfoCommand, ObjectKind,
    RenewCommand, RestoreCommand, TransferCommand, UpdateCommand,
};

/// Parse `1`, `2y` or `6m` into a period.
///
/// # Errors
///
/// Returns a message suitable for clap when the value is malformed or outside
/// 1..=99.
pub fn parse_period(value: &str) -> Result<Period, String> {
    let (digits, months) = match value.strip_suffix(['m', 'M']) {
        Some(digits) => (digits, true),
        None => (value.strip_suffix(['y', 'Y']).unwrap_or(value), false),
    };
    let n: u16 = digits
        .parse()
        .map_err(|_| format!("invalid period {value:?} (expected e.g. 1, 2y, 6m)"))?;
    let period = if months { Period::months(n) } else { Period::years(n) };
    if !period.is_valid() {
        return Err(format!("period must be between 1 and {}", Period::MAX_VALUE));
    }
    Ok(period)
}

/// Parse `status` or `status=reason`.
///
/// # Errors
///
/// Returns a message when the status name is empty.
pub fn parse_status(value: &str) -> Result<Status, String> {
    let (name, reason) = match value.split_once('=') {
        Some((name, reason)) => (name.trim(), Some(reason.trim())),
        None => (value.trim(), None),
    };
    if name.is_empty() {
        return Err("status must not be empty".to_string());
    }
    let status = Status::new(name);
    Ok(match reason {
        Some(r) if !r.is_empty() => status.with_reason(r),
        _ => status,
    })
}

/// Read a document from a path, or stdin for `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is empty.
pub async fn read_document(file: &str) -> Result<Vec<u8>> {
    let data = if file == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Could not read stdin")?;
        buf
    } else {
        tokio::fs::read(file)
            .await
            .with_context(|| format!("Could not read {file}"))?
    };
    if data.iter().all(u8::is_ascii_whitespace) {
        bail!("Document {file} is empty");
    }
    Ok(data)
}

impl ExtensionArgs {
    fn extensions(&self) -> Vec<Extension> {
        let mut exts = Vec::new();
        if let Some(amount) = &self.fee {
            exts.push(Extension::fee(amount.clone(), self.currency.clone()));
        }
        if let Some(sub_product) = &self.namestore {
            exts.push(Extension::Namestore {
                sub_product: sub_product.clone(),
            });
        }
        exts
    }
}

/// Run one command and print its result.
///
/// # Errors
///
/// Returns session errors with context naming the failed operation.
pub async fn run<T: Transport>(
    session: &Session<T>,
    profile: &Profile,
    command: &Command,
    raw: Option<Vec<u8>>,
    json: bool,
) -> Result<()> {
    if let Command::Hello = command {
        let greeting = session.hello().await.context("Hello failed")?;
        return emit(&greeting, json);
    }

    if !matches!(command, Command::Raw { no_login: true, .. }) {
        session
            .login(&profile.user, &profile.password, None)
            .await
            .with_context(|| format!("Login as {} failed", profile.user))?;
    }

    if let (Command::Raw { .. }, Some(payload)) = (command, raw) {
        let frame = session.raw(&payload).await.context("Raw exchange failed")?;
        println!("{}", String::from_utf8_lossy(&frame));
        return Ok(());
    }

    match command {
        Command::Hello | Command::Raw { .. } => Ok(()),
        Command::Check(args) => check(session, args, json).await,
        Command::Info { object } => info(session, object, json).await,
        Command::Create { object } => create(session, object, json).await,
        Command::Delete { object } => delete(session, object, json).await,
        Command::Renew { object } => renew(session, object, json).await,
        Command::Restore { object } => restore(session, object, json).await,
        Command::Transfer { object } => transfer(session, object, json).await,
        Command::Poll { ack } => poll(session, ack.as_deref(), json).await,
        Command::Update { object } => update(session, object, json).await,
    }
}

async fn check<T: Transport>(session: &Session<T>, args: &CheckArgs, json: bool) -> Result<()> {
    let results = match args.kind {
        ObjectKind::Domain => {
            let pricing = args.fee.then(|| FeeQuery {
                command: args.fee_command.clone(),
                currency: args.currency.clone(),
                period: args.period,
            });
            session
                .check_domains(&args.names, pricing.as_ref(), &[])
                .await
        }
        ObjectKind::Contact => session.check_contacts(&args.names).await,
        ObjectKind::Host => session.check_hosts(&args.names).await,
    }
    .context("Check failed")?;
    emit(&results, json)
}

async fn info<T: Transport>(session: &Session<T>, object: &InfoCommand, json: bool) -> Result<()> {
    match object {
        InfoCommand::Domain {
            name,
            auth,
            hosts,
            ext,
        } => {
            let info = session
                .domain_info(name, *hosts, auth.as_deref(), &ext.extensions())
                .await
                .with_context(|| format!("Info for domain {name} failed"))?;
            emit(&info, json)
        }
        InfoCommand::Contact { id, auth } => {
            let info = session
                .contact_info(id, auth.as_deref())
                .await
                .with_context(|| format!("Info for contact {id} failed"))?;
            emit(&info, json)
        }
        InfoCommand::Host { name } => {
            let info = session
                .host_info(name)
                .await
                .with_context(|| format!("Info for host {name} failed"))?;
            emit(&info, json)
        }
    }
}

async fn create<T: Transport>(
    session: &Session<T>,
    object: &CreateCommand,
    json: bool,
) -> Result<()> {
    match object {
        CreateCommand::Domain {
            name,
            period,
            registrant,
            admin,
            tech,
            billing,
            ns,
            auth,
            launch_phase,
            ext,
        } => {
            let contacts = [
                (ContactType::Admin, admin),
                (ContactType::Tech, tech),
                (ContactType::Billing, billing),
            ]
            .into_iter()
            .filter_map(|(kind, id)| id.as_ref().map(|id| DomainContact::new(kind, id.clone())))
            .collect();
            let params = DomainCreate {
                name: name.clone(),
                period: *period,
                nameservers: ns.clone(),
                registrant: registrant.clone(),
                contacts,
                auth_info: auth.clone(),
            };
            let mut exts = ext.extensions();
            if let Some(phase) = launch_phase {
                exts.push(Extension::LaunchPhase {
                    phase: phase.clone(),
                });
            }
            let created = session
                .create_domain(&params, &exts)
                .await
                .with_context(|| format!("Create of domain {name} failed"))?;
            emit(&created, json)
        }
        CreateCommand::Contact {
            id,
            name,
            org,
            street,
            city,
            sp,
            pc,
            cc,
            voice,
            fax,
            email,
            auth,
        } => {
            let params = ContactCreate {
                id: id.clone(),
                postal: PostalInfo {
                    name: name.clone(),
                    org: org.clone(),
                    street: street.clone(),
                    city: city.clone(),
                    sp: sp.clone(),
                    pc: pc.clone(),
                    cc: cc.clone(),
                },
                voice: voice.clone(),
                fax: fax.clone(),
                email: email.clone(),
                auth_info: auth.clone(),
            };
            let created = session
                .create_contact(&params)
                .await
                .with_context(|| format!("Create of contact {id} failed"))?;
            emit(&created, json)
        }
        CreateCommand::Host { name, addr } => {
            let created = session
                .create_host(name, addr)
                .await
                .with_context(|| format!("Create of host {name} failed"))?;
            emit(&created, json)
        }
    }
}

async fn delete<T: Transport>(
    session: &Session<T>,
    object: &DeleteCommand,
    json: bool,
) -> Result<()> {
    let response = match object {
        DeleteCommand::Domain { name, ext } => session
            .delete_domain(name, &ext.extensions())
            .await
            .with_context(|| format!("Delete of domain {name} failed"))?,
        DeleteCommand::Contact { id } => session
            .delete_contact(id)
            .await
            .with_context(|| format!("Delete of contact {id} failed"))?,
        DeleteCommand::Host { name } => session
            .delete_host(name)
            .await
            .with_context(|| format!("Delete of host {name} failed"))?,
    };
    emit(&response, json)
}

async fn renew<T: Transport>(session: &Session<T>, object: &RenewCommand, json: bool) -> Result<()> {
    let RenewCommand::Domain {
        name,
        period,
        exp,
        ext,
    } = object;

    let current_expiry = match exp {
        Some(date) => *date,
        None => {
            let info = session
                .domain_info(name, HostsFilter::None, None, &[])
                .await
                .with_context(|| format!("Could not fetch current expiry of {name}"))?;
            let expires = info
                .expires
                .with_context(|| format!("Server did not report an expiry date for {name}"))?;
            tracing::info!("Current expiry of {name}: {}", expires.date_naive());
            expires.date_naive()
        }
    };

    let renewed = session
        .renew_domain(name, current_expiry, *period, &ext.extensions())
        .await
        .with_context(|| format!("Renew of domain {name} failed"))?;
    emit(&renewed, json)
}

async fn restore<T: Transport>(
    session: &Session<T>,
    object: &RestoreCommand,
    json: bool,
) -> Result<()> {
    let RestoreCommand::Domain { name, ext } = object;
    let response = session
        .restore_domain(name, &ext.extensions())
        .await
        .with_context(|| format!("Restore of domain {name} failed"))?;
    emit(&response, json)
}

async fn transfer<T: Transport>(
    session: &Session<T>,
    object: &TransferCommand,
    json: bool,
) -> Result<()> {
    let TransferCommand::Domain {
        name,
        op,
        auth,
        period,
        ext,
    } = object;
    let transfer = session
        .transfer_domain(*op, name, *period, auth.as_deref(), &ext.extensions())
        .await
        .with_context(|| format!("Transfer {op} of domain {name} failed"))?;
    match transfer {
        Some(transfer) => emit(&transfer, json),
        None => {
            if !json {
                println!("Transfer {op} of {name} completed");
            }
            Ok(())
        }
    }
}

async fn poll<T: Transport>(session: &Session<T>, ack: Option<&str>, json: bool) -> Result<()> {
    let response: Response = match ack {
        Some(id) => session
            .poll_ack(id)
            .await
            .with_context(|| format!("Acknowledging message {id} failed"))?,
        None => session.poll_request().await.context("Poll failed")?,
    };
    emit(&response, json)
}

fn status_ops<A, C>(
    ops: &mut Vec<UpdateOp<A, C>>,
    add: &[Status],
    rem: &[Status],
    wrap: impl Fn(Status) -> A,
) {
    ops.extend(add.iter().cloned().map(|s| UpdateOp::Add(wrap(s))));
    ops.extend(rem.iter().cloned().map(|s| UpdateOp::Remove(wrap(s))));
}

fn contact_ops(ops: &mut Vec<DomainUpdate>, kind: ContactType, add: &[String], rem: &[String]) {
    for id in add {
        ops.push(UpdateOp::Add(DomainAttr::Contact(DomainContact::new(kind, id.clone()))));
    }
    for id in rem {
        ops.push(UpdateOp::Remove(DomainAttr::Contact(DomainContact::new(kind, id.clone()))));
    }
}

fn require_changes<A, C>(ops: &[UpdateOp<A, C>]) -> Result<()> {
    if ops.is_empty() {
        bail!("Nothing to update; pass at least one --add-*, --rem-* or change option");
    }
    Ok(())
}

async fn update<T: Transport>(
    session: &Session<T>,
    object: &UpdateCommand,
    json: bool,
) -> Result<()> {
    let response = match object {
        UpdateCommand::Domain {
            name,
            add_ns,
            rem_ns,
            add_status,
            rem_status,
            add_admin,
            rem_admin,
            add_tech,
            rem_tech,
            add_billing,
            rem_billing,
            chg_registrant,
            chg_auth,
            ext,
        } => {
            let mut ops: Vec<DomainUpdate> = Vec::new();
            ops.extend(add_ns.iter().map(|ns| UpdateOp::Add(DomainAttr::Nameserver(ns.clone()))));
            ops.extend(rem_ns.iter().map(|ns| UpdateOp::Remove(DomainAttr::Nameserver(ns.clone()))));
            contact_ops(&mut ops, ContactType::Admin, add_admin, rem_admin);
            contact_ops(&mut ops, ContactType::Tech, add_tech, rem_tech);
            contact_ops(&mut ops, ContactType::Billing, add_billing, rem_billing);
            status_ops(&mut ops, add_status, rem_status, DomainAttr::Status);
            if let Some(registrant) = chg_registrant {
                ops.push(UpdateOp::Change(DomainChange::Registrant(registrant.clone())));
            }
            if let Some(auth) = chg_auth {
                ops.push(UpdateOp::Change(DomainChange::AuthInfo(auth.clone())));
            }
            require_changes(&ops)?;
            session
                .update_domain(name, &ops, &ext.extensions())
                .await
                .with_context(|| format!("Update of domain {name} failed"))?
        }
        UpdateCommand::Contact {
            id,
            add_status,
            rem_status,
            voice,
            fax,
            email,
            auth,
        } => {
            let mut ops = Vec::new();
            status_ops(&mut ops, add_status, rem_status, ContactAttr::Status);
            let changes = [
                voice.clone().map(ContactChange::Voice),
                fax.clone().map(ContactChange::Fax),
                email.clone().map(ContactChange::Email),
                auth.clone().map(ContactChange::AuthInfo),
            ];
            ops.extend(changes.into_iter().flatten().map(UpdateOp::Change));
            require_changes(&ops)?;
            session
                .update_contact(id, &ops)
                .await
                .with_context(|| format!("Update of contact {id} failed"))?
        }
        UpdateCommand::Host {
            name,
            add_addr,
            rem_addr,
            add_status,
            rem_status,
            new_name,
        } => {
            let mut ops = Vec::new();
            ops.extend(add_addr.iter().map(|a| UpdateOp::Add(HostAttr::Address(*a))));
            ops.extend(rem_addr.iter().map(|a| UpdateOp::Remove(HostAttr::Address(*a))));
            status_ops(&mut ops, add_status, rem_status, HostAttr::Status);
            if let Some(new_name) = new_name {
                ops.push(UpdateOp::Change(HostChange::Name(new_name.clone())));
            }
            require_changes(&ops)?;
            session
                .update_host(name, &ops)
                .await
                .with_context(|| format!("Update of host {name} failed"))?
        }
    };
    emit(&response, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use epp_client::SessionOptions;
    use epp_types::PeriodUnit;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    const GREETING: &str = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><greeting>
<svID>Test Registry</svID><svcMenu><version>1.0</version><lang>en</lang>
<objURI>urn:ietf:params:xml:ns:domain-1.0</objURI></svcMenu></greeting></epp>"#;

    const OK: &str = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><response>
<result code="1000"><msg>Command completed successfully</msg></result>
<trID><svTRID>SV-1</svTRID></trID></response></epp>"#;

    const POLL: &str = r#"<epp xmlns="urn:ietf:params:xml:ns:epp-1.0"><command><poll op="req"/></command></epp>"#;

    async fn write_frame(stream: &mut DuplexStream, payload: &str) {
        let len = u32::try_from(payload.len() + 4).unwrap();
        stream.write_all(&len.to_be_bytes()).await.unwrap();
        stream.write_all(payload.as_bytes()).await.unwrap();
    }

    async fn read_frame(stream: &mut DuplexStream) -> String {
        let mut header = [0u8; 4];
        stream.read_exact(&mut header).await.unwrap();
        let mut payload = vec![0u8; u32::from_be_bytes(header) as usize - 4];
        stream.read_exact(&mut payload).await.unwrap();
        String::from_utf8(payload).unwrap()
    }

    /// Answer every command with 1000 and return the commands received.
    async fn raw_exchange(no_login: bool, frames: usize) -> Vec<String> {
        let (client, mut server) = tokio::io::duplex(64 * 1024);
        let server = tokio::spawn(async move {
            write_frame(&mut server, GREETING).await;
            let mut seen = Vec::new();
            for _ in 0..frames {
                seen.push(read_frame(&mut server).await);
                write_frame(&mut server, OK).await;
            }
            seen
        });

        let session = Session::connect(client, SessionOptions::default()).await.unwrap();
        let profile = Profile {
            addr: "epp.example.net:700".to_string(),
            user: "ClientX".to_string(),
            password: "foo-BAR2".to_string(),
            ..Profile::default()
        };
        let command = Command::Raw {
            file: "-".to_string(),
            no_login,
        };
        run(&session, &profile, &command, Some(POLL.as_bytes().to_vec()), false)
            .await
            .unwrap();
        server.await.unwrap()
    }

    #[tokio::test]
    async fn test_raw_logs_in_before_sending() {
        let seen = raw_exchange(false, 2).await;
        assert!(seen[0].contains("<login><clID>ClientX</clID>"));
        assert_eq!(seen[1], POLL);
    }

    #[tokio::test]
    async fn test_raw_without_login() {
        let seen = raw_exchange(true, 1).await;
        assert_eq!(seen, vec![POLL.to_string()]);
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("1"), Ok(Period::years(1)));
        assert_eq!(parse_period("2y"), Ok(Period::years(2)));
        let months = parse_period("6m").unwrap();
        assert_eq!(months.unit, PeriodUnit::Month);
        assert_eq!(months.value, 6);
        assert!(parse_period("0").is_err());
        assert!(parse_period("100y").is_err());
        assert!(parse_period("ten").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("clientHold"), Ok(Status::new("clientHold")));
        assert_eq!(
            parse_status("clientHold=unpaid invoice"),
            Ok(Status::new("clientHold").with_reason("unpaid invoice"))
        );
        assert_eq!(parse_status("ok="), Ok(Status::new("ok")));
        assert!(parse_status("=reason").is_err());
    }

    #[test]
    fn test_extension_args() {
        let args = ExtensionArgs {
            fee: Some("10.00".to_string()),
            currency: Some("USD".to_string()),
            namestore: Some("COM".to_string()),
        };
        assert_eq!(
            args.extensions(),
            vec![
                Extension::fee("10.00", Some("USD".to_string())),
                Extension::Namestore {
                    sub_product: "COM".to_string()
                },
            ]
        );
        assert!(ExtensionArgs::default().extensions().is_empty());
    }

    #[test]
    fn test_contact_ops() {
        let mut ops = Vec::new();
        contact_ops(&mut ops, ContactType::Tech, &["sh8013".to_string()], &["sh8014".to_string()]);
        assert_eq!(
            ops,
            vec![
                UpdateOp::Add(DomainAttr::Contact(DomainContact::new(ContactType::Tech, "sh8013"))),
                UpdateOp::Remove(DomainAttr::Contact(DomainContact::new(ContactType::Tech, "sh8014"))),
            ]
        );
        assert!(require_changes(&ops).is_ok());
        assert!(require_changes::<DomainAttr, DomainChange>(&[]).is_err());
    }
}
