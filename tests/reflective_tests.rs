//! Reflective construction: constructor discovery from fixed arguments

use fauxbuild::{
    BuilderError, BuilderProxy, Constructible, Constructor, ContractDescription, ContractError, Value, ValueType,
    create_reflective,
};

#[derive(Debug, Clone, PartialEq)]
struct Ticket {
    owner: String,
    seat: i32,
    priority: bool,
    row: char,
}

impl Constructible for Ticket {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("for_owner", &[ValueType::Text], |b, args| {
                Ticket::from_builder(b, args.first().and_then(Value::as_text).unwrap_or_default(), 'A')
            }),
            Constructor::new("for_owner_in_row", &[ValueType::Text, ValueType::Char], |b, args| {
                let row = match args.get(1) {
                    Some(Value::Char(row)) => *row,
                    _ => 'A',
                };
                Ticket::from_builder(b, args.first().and_then(Value::as_text).unwrap_or_default(), row)
            }),
        ]
    }
}

impl Ticket {
    fn from_builder(b: &BuilderProxy<Ticket>, owner: &str, row: char) -> Result<Ticket, BuilderError> {
        Ok(Ticket {
            owner: owner.to_string(),
            seat: b.get("get_seat")?,
            priority: b.get("is_priority")?,
            row,
        })
    }
}

fn ticket_contract() -> ContractDescription {
    ContractDescription::new("TicketBuilder", "Ticket")
        .writer("set_seat", ValueType::Int)
        .reader("get_seat", ValueType::Int)
        .writer("set_priority", ValueType::Boolean)
        .operation(
            fauxbuild::Operation::reader("is_priority", ValueType::Boolean)
                .with_role(fauxbuild::Role::Reader(fauxbuild::SlotId::new("priority"))),
        )
        .terminal("build")
}

#[test]
fn test_discovers_constructor_by_fixed_arguments() {
    let mut builder = create_reflective::<Ticket>(ticket_contract(), vec![Value::from("ada")]).unwrap();
    builder.write("set_seat", 12).unwrap().write("set_priority", true).unwrap();
    assert_eq!(
        builder.build().unwrap(),
        Ticket {
            owner: "ada".to_string(),
            seat: 12,
            priority: true,
            row: 'A',
        }
    );
}

#[test]
fn test_fixed_argument_order_selects_overload() {
    let mut builder =
        create_reflective::<Ticket>(ticket_contract(), vec![Value::from("ada"), Value::Char('F')]).unwrap();
    let ticket = builder.build().unwrap();
    assert_eq!(ticket.row, 'F');
    assert_eq!(ticket.seat, 0);
    assert!(!ticket.priority);
}

#[test]
fn test_missing_constructor_fails_at_creation() {
    let err = create_reflective::<Ticket>(ticket_contract(), vec![Value::Int(3)]).unwrap_err();
    assert_eq!(
        err,
        BuilderError::NoMatchingConstructor {
            target: "Ticket".to_string(),
            signature: "builder, int".to_string(),
        }
    );
    assert_eq!(err.to_string(), "no constructor of `Ticket` accepts (builder, int)");
}

#[test]
fn test_invalid_contract_is_reported_before_discovery() {
    let description = ContractDescription::new("TicketBuilder", "Ticket").writer("set_seat", ValueType::Int);
    let err = create_reflective::<Ticket>(description, Vec::new()).unwrap_err();
    assert_eq!(
        err,
        BuilderError::Contract(ContractError::MissingTerminal {
            contract: "TicketBuilder".to_string(),
        })
    );
}
