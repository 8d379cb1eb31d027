//! Admin guard.

use salvo::prelude::*;

use crate::extensions::*;

/// Rejects callers whose token does not carry the admin flag.
///
/// Must run after [`super::middleware::handler`].
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(status) = depot.admin_or_403() {
        res.render(status);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
