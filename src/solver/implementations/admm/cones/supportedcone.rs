use super::*;
use crate::algebra::AsFloatT;
use crate::solver::core::ConeBlock;

// ---------------------------------------------------
// We define some machinery here for enumerating the
// cone types that the ADMM backend can project onto
// ---------------------------------------------------

#[enum_dispatch(Cone<T>)]
pub enum SupportedCone<T>
where
    T: FloatT,
{
    ZeroCone(ZeroCone<T>),
    NonnegativeCone(NonnegativeCone<T>),
    SecondOrderCone(SecondOrderCone<T>),
    PSDTriangleCone(PSDTriangleCone<T>),
    ExponentialCone(ExponentialCone<T>),
    PowerCone(PowerCone<T>),
}

pub fn make_cone<T: FloatT>(block: &ConeBlock) -> SupportedCone<T> {
    match *block {
        ConeBlock::Zero(dim) => ZeroCone::<T>::new(dim).into(),
        ConeBlock::Nonneg(dim) => NonnegativeCone::<T>::new(dim).into(),
        ConeBlock::Soc(dim) => SecondOrderCone::<T>::new(dim).into(),
        ConeBlock::Psd(k) => PSDTriangleCone::<T>::new(k).into(),
        ConeBlock::Exp => ExponentialCone::<T>::new(PrimalOrDualCone::PrimalCone).into(),
        ConeBlock::DualExp => ExponentialCone::<T>::new(PrimalOrDualCone::DualCone).into(),
        ConeBlock::Power(a) => {
            let pd = if a > 0.0 {
                PrimalOrDualCone::PrimalCone
            } else {
                PrimalOrDualCone::DualCone
            };
            PowerCone::<T>::new(a.abs().as_T(), pd).into()
        }
    }
}
