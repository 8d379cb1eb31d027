//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use sorveteria_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        catalog::MockCatalogService, coupons::MockCouponsService, customers::MockCustomersService,
        customers::records::CustomerUuid, favorites::MockFavoritesService,
        loyalty::MockLoyaltyService, orders::MockOrdersService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: CustomerUuid = CustomerUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CUSTOMER: Principal = Principal {
    customer: TEST_CUSTOMER_UUID,
    is_admin: false,
};

pub(crate) const TEST_ADMIN: Principal = Principal {
    customer: TEST_CUSTOMER_UUID,
    is_admin: true,
};

pub(crate) const TEST_RECENT_TRANSACTIONS: u32 = 5;

/// Puts a fixed caller in the depot in place of the bearer middleware.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectPrincipal(Principal);

#[handler]
impl InjectPrincipal {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_principal(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn inject_principal(principal: Principal) -> InjectPrincipal {
    InjectPrincipal(principal)
}

/// Service mocks behind a test [`State`].
///
/// Mocks left at their default have no expectations, so any call fails the test.
#[derive(Default)]
pub(crate) struct TestServices {
    pub(crate) customers: MockCustomersService,
    pub(crate) catalog: MockCatalogService,
    pub(crate) coupons: MockCouponsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) loyalty: MockLoyaltyService,
    pub(crate) favorites: MockFavoritesService,
    pub(crate) auth: MockAuthService,
}

impl TestServices {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(
            AppContext {
                customers: Arc::new(self.customers),
                catalog: Arc::new(self.catalog),
                coupons: Arc::new(self.coupons),
                orders: Arc::new(self.orders),
                loyalty: Arc::new(self.loyalty),
                favorites: Arc::new(self.favorites),
                auth: Arc::new(self.auth),
            },
            TEST_RECENT_TRANSACTIONS,
        )
    }

    /// Serve `route` as `principal`.
    pub(crate) fn serve(self, principal: Principal, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_principal(principal))
                .push(route),
        )
    }
}
