// src/services/pricing.rs
//
// Cálculo dos totais de pagamentos, vendas e notas fiscais.
// Os totais são sempre derivados no servidor; um total enviado pelo cliente
// só serve para conferência e nunca é gravado.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::{error::AppError, validation::MAX_AMOUNT};
use crate::models::{
    invoice::{Invoice, InvoiceItem},
    payment::Payment,
    sale::{Sale, SaleItem},
    service::Service,
};

/// Diferença máxima aceita entre o total enviado e o calculado (exclusiva).
fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

fn overflow(field: &str) -> AppError {
    AppError::invalid(field, "Valor calculado excede o limite permitido")
}

/// quantidade * unitário - desconto, sem estourar o `Decimal`.
fn line_total(field: &str, unit: Decimal, quantity: i32, discount: Decimal) -> Result<Decimal, AppError> {
    unit.checked_mul(Decimal::from(quantity))
        .and_then(|v| v.checked_sub(discount))
        .map(money)
        .ok_or_else(|| overflow(field))
}

/// Σ itens + imposto - desconto.
fn grand_total(field: &str, sum: Decimal, tax: Decimal, discount: Decimal) -> Result<Decimal, AppError> {
    sum.checked_add(tax)
        .and_then(|v| v.checked_sub(discount))
        .map(money)
        .ok_or_else(|| overflow(field))
}

// =============================================================================
//  REGRAS BÁSICAS
// =============================================================================

/// total = base * quantidade - desconto
pub fn payment_total(base_amount: Decimal, quantity: i32, discount: Decimal) -> Result<Decimal, AppError> {
    line_total("totalAmount", base_amount, quantity, discount)
}

/// Preenche `total_price` de cada item (quantidade * unitário) e devolve
/// total = Σ itens + imposto - desconto.
pub fn sale_total(items: &mut [SaleItem], tax: Decimal, discount: Decimal) -> Result<Decimal, AppError> {
    let mut sum = Decimal::ZERO;
    for (index, item) in items.iter_mut().enumerate() {
        let field = format!("items[{index}].totalPrice");
        item.total_price = line_total(&field, item.unit_price, item.quantity, Decimal::ZERO)?;
        sum = sum.checked_add(item.total_price).ok_or_else(|| overflow("totalAmount"))?;
    }
    grand_total("totalAmount", sum, tax, discount)
}

/// Preenche `total_price` de cada item (unitário * quantidade - desconto do
/// item) e devolve (subtotal, total).
pub fn invoice_totals(
    items: &mut [InvoiceItem],
    tax: Decimal,
    discount: Decimal,
) -> Result<(Decimal, Decimal), AppError> {
    let mut subtotal = Decimal::ZERO;
    for (index, item) in items.iter_mut().enumerate() {
        let field = format!("items[{index}].totalPrice");
        item.total_price = line_total(&field, item.unit_price, item.quantity, item.discount)?;
        check_total(&field, item.total_price)?;
        subtotal = subtotal.checked_add(item.total_price).ok_or_else(|| overflow("subtotal"))?;
    }
    check_total("subtotal", subtotal)?;
    Ok((subtotal, grand_total("total", subtotal, tax, discount)?))
}

/// Totais derivados precisam ser de no mínimo 0,01 e caber na coluna.
pub fn check_total(field: &str, value: Decimal) -> Result<(), AppError> {
    if value < tolerance() {
        return Err(AppError::invalid(
            field,
            format!("O total calculado ({value}) deve ser maior que zero"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(overflow(field));
    }
    Ok(())
}

/// Confere um total enviado pelo cliente contra o calculado.
pub fn check_submitted(field: &str, submitted: Option<Decimal>, derived: Decimal) -> Result<(), AppError> {
    match submitted {
        Some(value) if (value - derived).abs() >= tolerance() => Err(AppError::invalid(
            field,
            format!("Total informado ({value}) difere do valor calculado ({derived})"),
        )),
        _ => Ok(()),
    }
}

/// Número sequencial da nota com 6 dígitos ("000001").
pub fn format_invoice_number(seq: i64) -> String {
    format!("{seq:06}")
}

// =============================================================================
//  REGRAS POR ENTIDADE (aplicadas na criação e após o merge de um PUT)
// =============================================================================

pub fn reprice_payment(payment: &mut Payment, submitted: Option<Decimal>) -> Result<(), AppError> {
    let total = payment_total(payment.base_amount, payment.quantity, payment.discount)?;
    check_submitted("totalAmount", submitted, total)?;
    check_total("totalAmount", total)?;
    payment.total_amount = total;
    Ok(())
}

pub fn reprice_sale(sale: &mut Sale, submitted: Option<Decimal>) -> Result<(), AppError> {
    let total = sale_total(&mut sale.items, sale.tax, sale.discount)?;
    check_submitted("totalAmount", submitted, total)?;
    check_total("totalAmount", total)?;
    sale.total_amount = total;
    Ok(())
}

pub fn reprice_invoice(invoice: &mut Invoice, submitted: Option<Decimal>) -> Result<(), AppError> {
    if invoice.items.is_empty() {
        return Err(AppError::invalid("items", "A nota deve ter ao menos um item"));
    }
    let (subtotal, total) = invoice_totals(&mut invoice.items, invoice.tax, invoice.discount)?;
    check_submitted("total", submitted, total)?;
    check_total("total", total)?;
    invoice.subtotal = subtotal;
    invoice.total = total;
    Ok(())
}

// =============================================================================
//  ITENS DE VENDA
// =============================================================================

/// Venda sem itens: um item por serviço, com o preço do catálogo e quantidade 1.
pub fn items_from_catalog(service_ids: &[Uuid], catalog: &[Service]) -> Result<Vec<SaleItem>, AppError> {
    service_ids
        .iter()
        .map(|id| {
            let service = catalog
                .iter()
                .find(|s| s.id == *id)
                .ok_or_else(|| AppError::invalid("serviceIds", format!("Serviço {id} não encontrado")))?;
            Ok(SaleItem {
                service_id: service.id,
                quantity: 1,
                unit_price: service.price,
                total_price: Decimal::ZERO,
            })
        })
        .collect()
}

/// Venda com itens e sem `serviceIds`: os serviços vêm dos itens (sem repetição).
pub fn service_ids_from_items(items: &[SaleItem]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(items.len());
    for item in items {
        if !ids.contains(&item.service_id) {
            ids.push(item.service_id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    fn sale_item(quantity: i32, unit_price: Decimal) -> SaleItem {
        SaleItem {
            service_id: Uuid::new_v4(),
            quantity,
            unit_price,
            total_price: Decimal::ZERO,
        }
    }

    fn payment_fixture(now: chrono::DateTime<Utc>) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            method: crate::models::payment::PaymentMethod::Pix,
            status: crate::models::payment::PaymentStatus::Pendente,
            transaction_id: None,
            quantity: 1,
            base_amount: d(100, 0),
            discount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            service_id: None,
            client_id: None,
            notes: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn invoice_item(quantity: i32, unit_price: Decimal, discount: Decimal) -> InvoiceItem {
        InvoiceItem {
            product_id: None,
            service_id: None,
            description: "Pastilha de freio".into(),
            quantity,
            unit_price,
            discount,
            total_price: Decimal::ZERO,
        }
    }

    #[test]
    fn payment_total_is_base_times_quantity_minus_discount() {
        // 100.00 * 2 - 10.00
        assert_eq!(payment_total(d(10000, 2), 2, d(1000, 2)).unwrap(), d(19000, 2));
    }

    #[test]
    fn sale_total_sums_items_plus_tax_minus_discount() {
        // itens 50*2 + 30*1 = 130; +5 de imposto -10 de desconto = 125
        let mut items = vec![sale_item(2, d(50, 0)), sale_item(1, d(30, 0))];
        let total = sale_total(&mut items, d(5, 0), d(10, 0)).unwrap();
        assert_eq!(items[0].total_price, d(100, 0));
        assert_eq!(items[1].total_price, d(30, 0));
        assert_eq!(total, d(125, 0));
    }

    #[test]
    fn invoice_totals_apply_item_and_global_discounts() {
        // (20*3 - 5) = 55 ; subtotal 55 ; 55 + 2 - 7 = 50
        let mut items = vec![invoice_item(3, d(20, 0), d(5, 0))];
        let (subtotal, total) = invoice_totals(&mut items, d(2, 0), d(7, 0)).unwrap();
        assert_eq!(items[0].total_price, d(55, 0));
        assert_eq!(subtotal, d(55, 0));
        assert_eq!(total, d(50, 0));
    }

    #[test]
    fn invoice_item_cannot_be_discounted_to_zero() {
        let mut items = vec![invoice_item(1, d(10, 0), d(10, 0))];
        let err = invoice_totals(&mut items, Decimal::ZERO, Decimal::ZERO).unwrap_err();
        match err {
            AppError::ValidationError(fields) => assert_eq!(fields[0].field, "items[0].totalPrice"),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn submitted_total_within_tolerance_is_accepted() {
        assert!(check_submitted("totalAmount", Some(d(19000, 2)), d(19000, 2)).is_ok());
        assert!(check_submitted("totalAmount", Some(d(190009, 3)), d(19000, 2)).is_ok());
        assert!(check_submitted("totalAmount", None, d(19000, 2)).is_ok());
    }

    #[test]
    fn submitted_total_off_by_a_cent_is_rejected() {
        let err = check_submitted("totalAmount", Some(d(18999, 2)), d(19000, 2)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn derived_total_must_be_positive() {
        assert!(check_total("totalAmount", d(1, 2)).is_ok());
        assert!(check_total("totalAmount", Decimal::ZERO).is_err());
        assert!(check_total("totalAmount", d(-500, 2)).is_err());
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::ValidationError(fields) => fields[0].field.clone(),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn huge_amounts_are_rejected_instead_of_overflowing() {
        assert_eq!(field_of(payment_total(Decimal::MAX, 2, Decimal::ZERO).unwrap_err()), "totalAmount");

        let mut items = vec![sale_item(2, Decimal::MAX)];
        let err = sale_total(&mut items, Decimal::ZERO, Decimal::ZERO).unwrap_err();
        assert_eq!(field_of(err), "items[0].totalPrice");

        let mut items = vec![invoice_item(i32::MAX, Decimal::MAX, Decimal::ZERO)];
        let err = invoice_totals(&mut items, Decimal::ZERO, Decimal::ZERO).unwrap_err();
        assert_eq!(field_of(err), "items[0].totalPrice");
    }

    #[test]
    fn total_must_fit_the_money_column() {
        let mut payment = payment_fixture(Utc::now());
        payment.base_amount = MAX_AMOUNT;
        payment.quantity = 2;
        let err = reprice_payment(&mut payment, None).unwrap_err();
        assert_eq!(field_of(err), "totalAmount");
    }

    #[test]
    fn stored_payment_satisfies_its_formula() {
        // 33,33 * 3 - 0,99: o total gravado é exatamente base * quantidade - desconto
        let mut payment = payment_fixture(Utc::now());
        payment.base_amount = d(3333, 2);
        payment.quantity = 3;
        payment.discount = d(99, 2);
        reprice_payment(&mut payment, Some(d(9900, 2))).unwrap();
        assert_eq!(payment.total_amount, d(9900, 2));
        assert_eq!(
            payment.total_amount,
            payment.base_amount * Decimal::from(payment.quantity) - payment.discount
        );
    }

    #[test]
    fn invoice_numbers_are_zero_padded() {
        assert_eq!(format_invoice_number(1), "000001");
        assert_eq!(format_invoice_number(42), "000042");
        assert_eq!(format_invoice_number(1234567), "1234567");
    }

    #[test]
    fn items_are_derived_from_catalog_prices() {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            item: "Alinhamento".into(),
            description: "Alinhamento e balanceamento".into(),
            image: None,
            price: d(8990, 2),
            category: "Suspensão".into(),
            is_active: true,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let items = items_from_catalog(&[service.id], std::slice::from_ref(&service)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].unit_price, d(8990, 2));

        assert!(items_from_catalog(&[Uuid::new_v4()], &[service]).is_err());
    }

    #[test]
    fn service_ids_come_from_items_without_duplicates() {
        let a = sale_item(1, d(10, 0));
        let mut b = sale_item(2, d(10, 0));
        b.service_id = a.service_id;
        let c = sale_item(1, d(5, 0));
        assert_eq!(service_ids_from_items(&[a.clone(), b, c.clone()]), vec![a.service_id, c.service_id]);
    }
}
