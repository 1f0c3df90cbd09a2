//! Joining equally shaped arrays along a new leading axis.

use crate::array::NdArray;
use crate::{Element, NdError, Result};

/// Stack arrays of one shape into a new owned array with a leading axis of
/// length `arrays.len()`.
///
/// The result never shares a buffer with the inputs. An empty list gives an
/// empty rank-1 array.
///
/// # Example
///
/// ```rust
/// use ndsel::{stack, NdArray};
///
/// let a = NdArray::<f64>::zeros(&[100]);
/// let b = NdArray::<f64>::ones(&[100]);
/// let c = stack(&[&a, &b, &a]).unwrap();
/// assert_eq!(c.shape().as_slice(), &[3, 100]);
/// ```
pub fn stack<T: Element>(arrays: &[&NdArray<T>]) -> Result<NdArray<T>> {
    let Some(first) = arrays.first() else {
        return Ok(NdArray::empty(1));
    };
    let inner = first.shape();
    for array in &arrays[1..] {
        let shape = array.shape();
        if shape != inner {
            return Err(NdError::ShapeMismatch(inner.to_vec(), shape.to_vec()));
        }
    }

    let mut shape = Vec::with_capacity(inner.len() + 1);
    shape.push(arrays.len());
    shape.extend_from_slice(&inner);

    let mut data = Vec::with_capacity(shape.iter().product());
    for array in arrays {
        data.extend(array.iter());
    }
    log::debug!("stack {} arrays into shape {:?}", arrays.len(), shape);
    NdArray::from_shape_vec(&shape, data)
}
